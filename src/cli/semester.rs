use clap::Parser;
use scholarship::Semester;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
pub struct SemesterCommand {
    /// Semesters to parse, e.g. "SP17", "Fall 2016" or "2017-02-15"
    #[arg(required = true)]
    values: Vec<String>,
}

impl SemesterCommand {
    pub fn run(self) -> anyhow::Result<()> {
        let mut failed = 0;

        for value in &self.values {
            match value.parse::<Semester>() {
                Ok(semester) => println!(
                    "{value}: {semester} {} {}",
                    semester.compact().dim(),
                    semester.canonical_date().to_string().dim()
                ),
                Err(e) => {
                    failed += 1;
                    println!("{}", format!("{value}: {e}").problem());
                }
            }
        }

        if failed > 0 {
            anyhow::bail!("{failed} value(s) could not be parsed");
        }
        Ok(())
    }
}
