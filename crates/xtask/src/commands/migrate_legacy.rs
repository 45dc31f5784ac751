//! Import the pre-slot `game_save.json` into the default slot.

use anyhow::Result;
use clap::Parser;
use console::style;
use save_runtime::{LegacyImport, PersistenceConfig};

use crate::utils;

/// Import the legacy single-file save into the default slot
#[derive(Parser, Debug)]
pub struct MigrateLegacy {}

impl MigrateLegacy {
    pub fn execute(self, config: &PersistenceConfig) -> Result<()> {
        let repo = utils::open_repository(config)?;

        match repo.import_legacy() {
            LegacyImport::NoLegacyFile => {
                println!("{}", style("No legacy save found").dim());
            }
            LegacyImport::SlotOccupied => {
                println!(
                    "{} Default slot already holds a save; legacy file left in place",
                    style("!").yellow().bold()
                );
            }
            LegacyImport::Imported { retired } => {
                println!(
                    "{} Imported legacy save into the default slot",
                    style("✓").green().bold()
                );
                if !retired {
                    println!(
                        "  {}",
                        style("legacy file could not be renamed and was kept").yellow()
                    );
                }
            }
            LegacyImport::Failed(reason) => {
                anyhow::bail!("Legacy import failed: {reason}");
            }
        }

        Ok(())
    }
}
