//! Clean save data and logs command
//!
//! Provides utilities to clean up persistent data:
//! - Logs (cache directory)
//! - Leftover staging files from interrupted saves
//! - Save data (the whole save root)
//!
//! Safety: Always prompts for confirmation before deletion.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use save_core::SaveConfig;
use save_runtime::PersistenceConfig;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::{dirs, utils};

/// Clean save data and logs
#[derive(Parser, Debug)]
pub struct Clean {
    /// Clean only logs (cache directory)
    #[arg(long)]
    pub logs: bool,

    /// Remove only leftover `.tmp` files in the save root
    #[arg(long)]
    pub temp: bool,

    /// Clean the whole save root, including every slot
    #[arg(long)]
    pub data: bool,

    /// Skip confirmation prompt (dangerous!)
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Specific session to clean (only works with --logs)
    #[arg(long)]
    pub session: Option<String>,
}

enum Target {
    Dir(PathBuf),
    File(PathBuf),
}

impl Clean {
    pub fn execute(self, config: &PersistenceConfig, current_session: &str) -> Result<()> {
        // Without flags: logs and stale temp files, never saves
        let clean_logs = self.logs || !(self.temp || self.data);
        let clean_temp = self.temp || !(self.logs || self.data);

        if self.session.is_some() && !self.logs {
            anyhow::bail!("--session can only be used with --logs");
        }

        let mut targets: Vec<(String, Target)> = Vec::new();

        if clean_logs {
            let log_dir = dirs::log_dir();
            if let Some(ref session_id) = self.session {
                let session_dir = log_dir.join(session_id);
                if !session_dir.exists() {
                    eprintln!(
                        "{} Session not found: {}",
                        style("✗").red().bold(),
                        style(session_id).cyan()
                    );
                    anyhow::bail!("Session directory does not exist");
                }
                targets.push((format!("Session logs ({session_id})"), Target::Dir(session_dir)));
            } else {
                for (session_id, path) in dirs::list_sessions(&log_dir)? {
                    if session_id != current_session {
                        targets.push((format!("Session logs ({session_id})"), Target::Dir(path)));
                    }
                }
            }
        }

        if clean_temp {
            for path in stale_temp_files(&config.save_root)? {
                let label = format!("Staging file ({})", file_label(&path));
                targets.push((label, Target::File(path)));
            }
        }

        if self.data && config.save_root.exists() {
            targets.push((
                "Save data (all slots)".to_string(),
                Target::Dir(config.save_root.clone()),
            ));
        }

        if targets.is_empty() {
            println!("{}", style("Nothing to clean").dim());
            return Ok(());
        }

        println!("{}", style("🧹 Clean Save Data").yellow().bold());
        println!();
        println!("The following will be deleted:");
        for (label, target) in &targets {
            let path = match target {
                Target::Dir(path) | Target::File(path) => path,
            };
            println!("  {} {}", style("→").cyan(), style(label).bold());
            println!("    {}", style(path.display()).dim());
        }
        println!();

        if !self.yes && !utils::confirm("Proceed?")? {
            println!("{}", style("Cancelled").dim());
            return Ok(());
        }

        for (label, target) in targets {
            print!("Deleting {label}... ");
            io::stdout().flush()?;

            let removed = match target {
                Target::Dir(path) => std::fs::remove_dir_all(&path),
                Target::File(path) => std::fs::remove_file(&path),
            };
            removed.with_context(|| format!("Failed to delete: {label}"))?;

            println!("{}", style("✓").green());
        }

        println!();
        println!("{}", style("✓ Cleanup complete!").green().bold());

        Ok(())
    }
}

/// `.tmp` files left behind by interrupted writes.
fn stale_temp_files(save_root: &Path) -> Result<Vec<PathBuf>> {
    if !save_root.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(save_root)
        .with_context(|| format!("Failed to read save root: {}", save_root.display()))?
    {
        let path = entry?.path();
        if path.is_file()
            && let Some(name) = path.file_name().and_then(|n| n.to_str())
            && name.starts_with(SaveConfig::SLOT_FILE_PREFIX)
            && name.ends_with(SaveConfig::TEMP_SUFFIX)
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
