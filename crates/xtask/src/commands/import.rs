//! Import a JSON save file into a slot.
//!
//! The file goes through validation and migration first, so only payloads
//! the game would accept are written.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use save_core::SchemaVersion;
use save_runtime::PersistenceConfig;
use std::path::PathBuf;

use crate::utils;

/// Import a JSON save file into a slot
#[derive(Parser, Debug)]
pub struct Import {
    /// Target slot (sanitized like in-game input)
    #[arg(value_name = "SLOT")]
    pub slot: String,

    /// JSON save file to import
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Overwrite the slot if it already holds a save (the old one becomes the backup)
    #[arg(long)]
    pub force: bool,
}

impl Import {
    pub fn execute(self, config: &PersistenceConfig) -> Result<()> {
        let raw = utils::read_json(&self.file)?;
        save_core::validate(&raw)
            .with_context(|| format!("{} is not a valid save", self.file.display()))?;
        let version = SchemaVersion::of(&raw).unwrap_or(SchemaVersion::LEGACY);
        let record = save_core::migrate(raw, version)?;

        let service = utils::open_service(config)?;
        if service.slot_exists(&self.slot) && !self.force {
            anyhow::bail!(
                "Slot '{}' already holds a save (use --force to overwrite)",
                save_core::SlotName::sanitize(&self.slot)
            );
        }

        let slot = service.save(&record, &self.slot)?;

        println!(
            "{} Imported {} (level {}) into slot {}",
            style("✓").green().bold(),
            style(&record.name).bold(),
            record.level,
            style(slot.as_str()).cyan()
        );
        if version < SchemaVersion::CURRENT {
            println!("  {}", style(format!("migrated from {version}")).dim());
        }
        if slot.as_str() != self.slot {
            println!("  {}", style(format!("slot name sanitized from {:?}", self.slot)).dim());
        }

        Ok(())
    }
}
