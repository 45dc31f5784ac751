//! Rename a save slot.

use anyhow::Result;
use clap::Parser;
use console::style;
use save_runtime::PersistenceConfig;

use crate::utils;

/// Rename a save slot
#[derive(Parser, Debug)]
pub struct Rename {
    /// Current slot name
    #[arg(value_name = "OLD")]
    pub old: String,

    /// New slot name (sanitized like in-game input)
    #[arg(value_name = "NEW")]
    pub new: String,
}

impl Rename {
    pub fn execute(self, config: &PersistenceConfig) -> Result<()> {
        let service = utils::open_service(config)?;
        let renamed = service.rename_slot(&self.old, &self.new)?;

        println!(
            "{} Renamed {} → {}",
            style("✓").green().bold(),
            style(&self.old).cyan(),
            style(renamed.as_str()).cyan()
        );

        Ok(())
    }
}
