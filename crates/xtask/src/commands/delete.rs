//! Delete a save slot (primary, backup and any staging file).

use anyhow::Result;
use clap::Parser;
use console::style;
use save_core::SlotName;
use save_runtime::PersistenceConfig;

use crate::utils;

/// Delete a save slot
#[derive(Parser, Debug)]
pub struct Delete {
    /// Slot to delete
    #[arg(value_name = "SLOT")]
    pub slot: String,

    /// Skip confirmation prompt (dangerous!)
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl Delete {
    pub fn execute(self, config: &PersistenceConfig) -> Result<()> {
        let service = utils::open_service(config)?;
        let slot = SlotName::sanitize(&self.slot);

        if !service.slot_exists(slot.as_str()) {
            println!("{}", style(format!("Slot '{slot}' does not exist")).dim());
        }

        if !self.yes && !utils::confirm(&format!("Delete slot '{slot}' and its backup?"))? {
            println!("{}", style("Cancelled").dim());
            return Ok(());
        }

        if service.delete_slot(slot.as_str())? {
            println!(
                "{} Deleted slot {}",
                style("✓").green().bold(),
                style(slot.as_str()).cyan()
            );
        } else {
            println!("{}", style("Nothing to delete").dim());
        }

        Ok(())
    }
}
