//! Check a JSON file against the save schema without importing it.

use anyhow::Result;
use clap::Parser;
use console::style;
use save_core::{MIGRATIONS, SchemaVersion};
use std::path::PathBuf;

use crate::utils;

/// Validate a save file
#[derive(Parser, Debug)]
pub struct Validate {
    /// JSON save file to check
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

impl Validate {
    pub fn execute(self) -> Result<()> {
        let raw = utils::read_json(&self.file)?;

        if let Err(err) = save_core::validate(&raw) {
            println!("{} {}", style("✗").red().bold(), style(self.file.display()).dim());
            println!("  {err}");
            anyhow::bail!("Validation failed");
        }

        let version = SchemaVersion::of(&raw).unwrap_or(SchemaVersion::LEGACY);
        let record = save_core::migrate(raw, version)?;

        println!("{} {}", style("✓").green().bold(), style(self.file.display()).dim());
        println!("  {} (level {}), schema {version}", record.name, record.level);

        let steps: Vec<_> = MIGRATIONS.iter().filter(|step| step.from >= version).collect();
        if steps.is_empty() {
            println!("  {}", style("up to date").dim());
        }
        for step in steps {
            println!(
                "  {} {} → {}: {}",
                style("↑").yellow(),
                step.from,
                step.to,
                step.description
            );
        }
        if version > SchemaVersion::CURRENT {
            println!(
                "  {}",
                style(format!(
                    "written by a newer build ({version}); unknown keys are kept"
                ))
                .yellow()
            );
        }

        Ok(())
    }
}
