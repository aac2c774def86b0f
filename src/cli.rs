use std::path::{Path, PathBuf};

mod catalog;
mod semester;
mod submit;
mod terminal;
mod validate;

use catalog::CatalogCommand;
use clap::ArgAction;
use scholarship::Config;
use semester::SemesterCommand;
use submit::Submit;
use tracing::instrument;
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the cycle configuration (defaults are used if omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        let config = load_config(self.config.as_deref())?;
        self.command.run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("no configuration given, using defaults");
        return Ok(Config::default());
    };
    Ok(Config::load(path)?)
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Validate an application and report every issue
    ///
    /// Exits with status 2 if any issue is found.
    Validate(Validate),

    /// Validate an application and mark it submitted if it is complete
    Submit(Submit),

    /// Parse semesters and show their forms
    Semester(SemesterCommand),

    /// Inspect an award and essay prompt catalog
    #[command(subcommand)]
    Catalog(CatalogCommand),

    /// Write the default configuration to a file
    InitConfig(InitConfig),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Validate(command) => command.run(config)?,
            Self::Submit(command) => command.run(config)?,
            Self::Semester(command) => command.run()?,
            Self::Catalog(command) => command.run(config)?,
            Self::InitConfig(command) => command.run()?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct InitConfig {
    /// Where to write the configuration
    #[arg(default_value = "scholarship.toml")]
    path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

impl InitConfig {
    #[instrument(skip(self))]
    fn run(self) -> anyhow::Result<()> {
        if self.path.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                self.path.display()
            );
        }

        Config::default()
            .save(&self.path)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", self.path.display()))?;

        println!("Created: {}", self.path.display());
        Ok(())
    }
}
