//! Read and inspect a single save slot.
//!
//! Loading goes through the same validation, backup fallback and migration
//! as the game, but nothing is written back.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use save_core::{Item, Skill, SlotName};
use save_runtime::{LoadSource, Loaded, PersistenceConfig, SlotRepository};
use strum::IntoEnumIterator;

use crate::utils;

/// Read and inspect a save slot
#[derive(Parser)]
pub struct Show {
    /// Slot to read (sanitized like in-game input)
    #[arg(value_name = "SLOT")]
    slot: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Character overview
    Summary,
    /// Full JSON payload as it would be written
    Json,
    /// Pretty-printed debug format
    Debug,
}

impl Show {
    pub fn execute(self, config: &PersistenceConfig) -> Result<()> {
        let repo = utils::open_repository(config)?;
        let slot = SlotName::sanitize(&self.slot);
        let loaded = repo
            .load(&slot)
            .with_context(|| format!("Failed to load slot '{slot}'"))?;

        match self.format {
            OutputFormat::Summary => print_summary(&slot, &loaded),
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&loaded.record.to_value()?)?);
            }
            OutputFormat::Debug => println!("{:#?}", loaded.record),
        }

        Ok(())
    }
}

fn print_summary(slot: &SlotName, loaded: &Loaded) {
    let record = &loaded.record;

    println!("{}", style(format!("📜 Slot '{slot}'")).green().bold());
    if loaded.slot != *slot {
        println!(
            "  {}",
            style(format!("slot files leave the save root, showing '{}'", loaded.slot)).red()
        );
    }
    if loaded.source == LoadSource::Backup {
        println!("  {}", style("primary is corrupted, showing backup").yellow());
    }
    if let Some(from) = loaded.migrated_from {
        println!(
            "  {}",
            style(format!("stored as {from}, shown migrated to {}", record.schema)).yellow()
        );
    }
    println!();

    println!("  Name:      {}", style(&record.name).cyan().bold());
    println!("  Level:     {} ({}/{} exp)", record.level, record.exp, record.exp_to_next);
    println!("  Gold:      {}", record.gold);
    println!("  HP:        {}/{}", record.attributes.hp, record.attributes.max_hp);
    println!(
        "  Stats:     STR {}  DEX {}  AGL {}  ({} unspent)",
        record.attributes.strength,
        record.attributes.dexterity,
        record.attributes.agility,
        record.attributes.stat_points
    );
    println!("  Location:  {}", record.current_location);
    println!("  Schema:    {}", record.schema);
    println!();

    println!("  {}", style("Equipment").bold());
    for (label, item) in [
        ("weapon", &record.equipment.weapon),
        ("armor", &record.equipment.armor),
        ("tool", &record.equipment.tool),
    ] {
        println!("    {label:<7} {}", item_label(item.as_ref()));
    }

    println!("  {}", style("Skills").bold());
    for skill in Skill::iter() {
        let progress = record.skills.progress(skill);
        println!(
            "    {:<7} Lv {:>2} ({}/{} exp)",
            skill.to_string(),
            progress.level,
            progress.exp,
            progress.exp_to_next
        );
    }

    println!(
        "  {} {} item(s), {} achievement(s), {} kills",
        style("Progress").bold(),
        record.inventory.len(),
        record.tracking.achievements.len(),
        record.tracking.total_kills
    );
    if !record.extra.is_empty() {
        let keys: Vec<&str> = record.extra.keys().map(String::as_str).collect();
        println!("  {} {}", style("Unknown keys").dim(), keys.join(", "));
    }
}

fn item_label(item: Option<&Item>) -> String {
    match item {
        None => "-".to_string(),
        Some(item) => item
            .get("name")
            .and_then(|name| name.as_str())
            .unwrap_or("<unnamed>")
            .to_string(),
    }
}
