use std::path::PathBuf;

use clap::Parser;
use scholarship::{
    Config, SubmitError,
    storage::{load_application, load_catalog, save_application},
    submit,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub struct Submit {
    /// The application file (YAML), updated in place on success
    application: PathBuf,

    /// The award and essay prompt catalog (YAML)
    #[arg(long)]
    catalog: PathBuf,
}

impl Submit {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let mut application = load_application(&self.application)?;
        let catalog = load_catalog(&self.catalog)?;

        match submit(&mut application, config, &catalog) {
            Ok(()) => {
                save_application(&application, &self.application)?;
                println!("{}", "✓ Application submitted".success());
                Ok(())
            }
            Err(SubmitError::Outstanding(issues)) => {
                println!(
                    "{}",
                    format!("✗ {} issue(s) must be resolved first:", issues.len()).warning()
                );
                for issue in &issues {
                    println!("    • {issue}");
                }
                std::process::exit(2);
            }
            Err(e) => Err(e.into()),
        }
    }
}
