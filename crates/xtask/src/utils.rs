//! Utility functions for xtask commands

use anyhow::{Context, Result};
use console::style;
use save_runtime::{FileSlotRepository, PersistenceConfig, SaveService};
use serde_json::Value;
use std::io::{self, Write};
use std::path::Path;

/// Open the configured save root as a file repository.
pub fn open_repository(config: &PersistenceConfig) -> Result<FileSlotRepository> {
    FileSlotRepository::new(&config.save_root)
        .with_context(|| format!("Failed to open save root: {}", config.save_root.display()))
}

/// Open the save service without the legacy import or migration write-back,
/// so inspecting commands never modify the save root.
pub fn open_service(config: &PersistenceConfig) -> Result<SaveService> {
    Ok(SaveService::new(open_repository(config)?).with_auto_resave(false))
}

/// Read a JSON document from disk.
pub fn read_json(path: &Path) -> Result<Value> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Prompt user for confirmation
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} ", style(format!("{prompt} [y/N]")).yellow().bold());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
