//! List save slots in the save root.

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use console::style;
use save_core::{SlotStatus, SlotSummary};
use save_runtime::PersistenceConfig;

use crate::utils;

/// List save slots
#[derive(Parser, Debug)]
pub struct List {
    /// Print summaries as JSON
    #[arg(long)]
    pub json: bool,
}

impl List {
    pub fn execute(self, config: &PersistenceConfig) -> Result<()> {
        let slots = utils::open_service(config)?.list_slots();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&slots)?);
            return Ok(());
        }

        println!("{}", style("💾 Save Slots").green().bold());
        println!("  Root: {}", style(config.save_root.display()).dim());
        println!();

        if slots.is_empty() {
            println!("{}", style("No saves found").dim());
            return Ok(());
        }

        for summary in &slots {
            println!("  {}", format_row(summary));
        }
        println!();
        println!("{} slot(s)", slots.len());

        Ok(())
    }
}

fn format_row(summary: &SlotSummary) -> String {
    let saved_at = summary
        .saved_at
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());

    match summary.status {
        SlotStatus::Healthy => format!(
            "{:<30}  {:<20}  Lv {:>3}  {}",
            style(summary.slot.as_str()).cyan(),
            summary.player_name.as_deref().unwrap_or("?"),
            summary.level.unwrap_or_default(),
            style(saved_at).dim()
        ),
        SlotStatus::Corrupted => format!(
            "{:<30}  {}  {}",
            style(summary.slot.as_str()).cyan(),
            style("CORRUPTED").red().bold(),
            style(saved_at).dim()
        ),
    }
}
