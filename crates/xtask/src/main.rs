//! Operator tasks for terminal RPG save slots
//!
//! This binary provides save-root utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod dirs;
mod logging;
mod utils;

use anyhow::Result;
use clap::Parser;
use commands::{Clean, Delete, Import, List, MigrateLegacy, Rename, Show, TailLogs, Validate};
use save_runtime::PersistenceConfig;
use std::path::PathBuf;

/// Operator tools for terminal RPG save slots
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Inspect and manage save slots", long_about = None)]
#[command(version)]
struct Cli {
    /// Save root to operate on (defaults to SAVE_DATA_DIR or ~/.terminal_rpg)
    #[arg(long, global = true, value_name = "DIR")]
    save_dir: Option<PathBuf>,

    /// Mirror log output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// List save slots
    List(List),

    /// Show the contents of a slot
    Show(Show),

    /// Import a JSON save file into a slot
    Import(Import),

    /// Delete a slot and its backup
    Delete(Delete),

    /// Rename a slot
    Rename(Rename),

    /// Validate a JSON save file against the schema
    Validate(Validate),

    /// Import the legacy single-file save into the default slot
    MigrateLegacy(MigrateLegacy),

    /// Clean logs and leftover staging files
    Clean(Clean),

    /// Monitor session logs in real-time
    TailLogs(TailLogs),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for SAVE_DATA_DIR and other env vars)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let session = logging::session_id();
    let _guard = logging::setup_logging(&session, cli.verbose)?;

    let mut config = PersistenceConfig::from_env();
    if let Some(dir) = cli.save_dir {
        config.save_root = dir;
    }
    tracing::debug!(root = %config.save_root.display(), "using save root");

    match cli.command {
        Command::List(cmd) => cmd.execute(&config),
        Command::Show(cmd) => cmd.execute(&config),
        Command::Import(cmd) => cmd.execute(&config),
        Command::Delete(cmd) => cmd.execute(&config),
        Command::Rename(cmd) => cmd.execute(&config),
        Command::Validate(cmd) => cmd.execute(),
        Command::MigrateLegacy(cmd) => cmd.execute(&config),
        Command::Clean(cmd) => cmd.execute(&config, &session),
        Command::TailLogs(cmd) => cmd.execute(&session),
    }
}
