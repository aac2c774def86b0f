use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use scholarship::{
    Config, Semester,
    domain::{Catalog, ChainReport, Slug},
    rules::{Context, award},
    storage::load_catalog,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub enum CatalogCommand {
    /// Show the newest revision of an award or essay prompt
    Latest(Latest),

    /// Check every version chain for splits, cycles and dangling links
    ///
    /// Exits with status 2 if any chain is broken.
    Check(Check),

    /// List the awards offered in a semester
    Offered(Offered),
}

impl CatalogCommand {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Latest(command) => command.run(),
            Self::Check(command) => command.run(),
            Self::Offered(command) => command.run(config),
        }
    }
}

#[derive(Debug, Parser)]
pub struct Latest {
    /// The identifier shared by every revision
    identifier: Slug,

    /// The catalog file (YAML)
    #[arg(long)]
    catalog: PathBuf,
}

impl Latest {
    #[instrument(level = "debug", skip(self))]
    fn run(self) -> anyhow::Result<()> {
        let catalog = load_catalog(&self.catalog)?;
        let mut found = false;

        if catalog.awards.identifiers().any(|id| id == &self.identifier) {
            let history = catalog.awards.history(&self.identifier)?;
            let latest = history.last();
            found = true;
            println!("award {}: {}", latest.id, latest.name);
            print_revisions(history.iter().map(|award| award.id.to_string()));
        }

        if catalog.prompts.identifiers().any(|id| id == &self.identifier) {
            let history = catalog.prompts.history(&self.identifier)?;
            let latest = history.last();
            found = true;
            println!(
                "essay prompt {} ({} words): {}",
                latest.id, latest.word_limit, latest.prompt
            );
            print_revisions(history.iter().map(|prompt| prompt.id.to_string()));
        }

        if !found {
            anyhow::bail!("'{}' is not in {}", self.identifier, self.catalog.display());
        }
        Ok(())
    }
}

fn print_revisions(ids: impl Iterator<Item = String>) {
    let ids: Vec<String> = ids.collect();
    println!("{}", format!("  revisions: {}", ids.join(" → ")).dim());
}

#[derive(Debug, Parser)]
pub struct Check {
    /// The catalog file (YAML)
    #[arg(long)]
    catalog: PathBuf,
}

impl Check {
    #[instrument(level = "debug", skip(self))]
    fn run(self) -> anyhow::Result<()> {
        let catalog = load_catalog(&self.catalog)?;

        let broken = report("Awards", &catalog.awards.diagnose())
            + report("Essay prompts", &catalog.prompts.diagnose());

        if broken == 0 {
            println!("\n{}", "Catalog is healthy (0 broken chains)".success());
        } else {
            println!(
                "\n{}",
                format!("Summary: {broken} broken chain(s) found").warning()
            );
            std::process::exit(2);
        }
        Ok(())
    }
}

fn report(kind: &str, reports: &[ChainReport]) -> usize {
    let broken: Vec<&ChainReport> = reports.iter().filter(|r| !r.is_healthy()).collect();
    if broken.is_empty() {
        println!("✓ {kind}: {} chain(s), all valid", reports.len());
        return 0;
    }

    println!(
        "{}",
        format!("✗ {kind}: {} of {} chain(s) broken", broken.len(), reports.len()).warning()
    );
    for chain in &broken {
        match &chain.latest {
            Ok(latest) => println!("    • {}: resolves to {latest}", chain.identifier),
            Err(e) => println!("    • {}", e.to_string().problem()),
        }
        for cycle in &chain.cycles {
            let ids: Vec<String> = cycle.iter().map(ToString::to_string).collect();
            println!("      cycle: {}", ids.join(" ↔ "));
        }
        for id in &chain.dangling {
            println!("      {id} points outside the chain");
        }
    }
    broken.len()
}

#[derive(Debug, Parser)]
pub struct Offered {
    /// The catalog file (YAML)
    #[arg(long)]
    catalog: PathBuf,

    /// The semester to list awards for (defaults to the configured due date)
    #[arg(long)]
    semester: Option<Semester>,
}

impl Offered {
    #[instrument(level = "debug", skip(self, config))]
    fn run(self, config: &Config) -> anyhow::Result<()> {
        let semester = match self.semester {
            Some(semester) => semester,
            None => config
                .current_semester()?
                .context("no --semester given and no due date configured")?,
        };

        let catalog: Catalog = load_catalog(&self.catalog)?;
        let context = Context::new(config, &catalog, semester);

        println!("Awards offered in {semester}:");
        for offered in award::offered(&context)? {
            let mut line = format!("  {} {}", offered.identifier, offered.name);
            if config.awards.is_endowment(&offered.identifier) {
                line.push_str(&" (endowment)".dim());
            }
            println!("{line}");
        }
        Ok(())
    }
}
