use std::path::PathBuf;

use clap::Parser;
use scholarship::{
    Config, IssueSet, Query,
    storage::{load_application, load_catalog},
    validate_application,
    validation::{Filter, Section},
    wizard::Page,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Validate an application against the award catalog")]
pub struct Validate {
    /// The application file (YAML)
    application: PathBuf,

    /// The award and essay prompt catalog (YAML)
    #[arg(long)]
    catalog: PathBuf,

    /// Only report issues in this section
    #[arg(long, value_name = "SECTION")]
    section: Option<Section>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

impl Validate {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let application = load_application(&self.application)?;
        let catalog = load_catalog(&self.catalog)?;

        let all = validate_application(&application, config, &catalog)?;
        let issues = match self.section {
            Some(section) => all.search(&Query::new().section(section))?,
            None => all.clone(),
        };

        if !self.quiet {
            match self.output {
                OutputFormat::Table => Self::output_table(&issues, &all),
                OutputFormat::Json => Self::output_json(&issues)?,
                OutputFormat::Summary => Self::output_summary(&issues),
            }
        }

        if !issues.is_empty() {
            std::process::exit(2);
        }

        Ok(())
    }

    fn output_table(issues: &IssueSet, all: &IssueSet) {
        println!("Validating application...\n");

        let global = issues
            .search(&Query::new().section(Filter::Absent))
            .unwrap_or_default();
        for issue in &global {
            println!("{}", format!("✗ {issue}").problem());
        }

        for section in Section::ALL {
            let found = issues
                .search(&Query::new().section(section))
                .unwrap_or_default();
            let label = format!("{:<10}", format!("{section}:"));

            if found.is_empty() {
                println!("✓ {label} no issues");
                continue;
            }

            println!(
                "{}",
                format!("✗ {label} {} issue(s)", found.len()).warning()
            );
            for issue in &found {
                println!("    • {issue} {}", format!("({})", issue.code().description()).dim());
            }
        }

        if issues.is_empty() {
            println!("\n{}", "Application is complete (0 issues)".success());
        } else {
            println!(
                "\n{}",
                format!("Summary: {} issue(s) found", issues.len()).warning()
            );
            let resume = Page::Feedback.redirect(all);
            println!(
                "{}",
                format!("Continue the application from the '{resume}' page").dim()
            );
        }
    }

    fn output_json(issues: &IssueSet) -> anyhow::Result<()> {
        use serde_json::json;

        let output = json!({
            "status": if issues.is_empty() { "complete" } else { "issues_found" },
            "issues": issues,
            "sections": issues.sections(),
            "summary": {
                "total_issues": issues.len(),
            }
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_summary(issues: &IssueSet) {
        println!("issues={}", issues.len());
    }
}
