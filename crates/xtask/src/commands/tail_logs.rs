//! Tail save engine logs command
//!
//! Monitors xtask session logs in real-time, similar to `tail -f`.
//! Automatically finds the latest session or monitors a specific session.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;
use std::time::Duration;

use crate::dirs;

/// Monitor session logs in real-time
#[derive(Parser, Debug)]
pub struct TailLogs {
    /// Specific session ID to monitor (defaults to latest)
    pub session: Option<String>,

    /// Number of lines to show from history before tailing
    #[arg(short = 'n', long, default_value = "10")]
    pub lines: usize,

    /// Poll interval in milliseconds
    #[arg(long, default_value = "100")]
    pub poll_interval: u64,
}

impl TailLogs {
    pub fn execute(self, current_session: &str) -> Result<()> {
        let log_dir = dirs::log_dir();

        if !log_dir.exists() {
            eprintln!("{}", style("✗ Log directory not found").red().bold());
            eprintln!("  Path: {}", style(log_dir.display()).dim());
            anyhow::bail!("Log directory does not exist");
        }

        let (session_id, log_path) = match self.session {
            Some(ref session) => (session.clone(), dirs::find_session_log(&log_dir, session)?),
            None => dirs::find_latest_log(&log_dir, Some(current_session))
                .context("Failed to find latest log file")?,
        };

        println!("{}", style("📝 Monitoring Save Logs").green().bold());
        println!("  Session:  {}", style(&session_id).cyan());
        println!("  Log file: {}", style(log_path.display()).dim());
        println!();

        self.tail_file(&log_path)
    }

    /// Print the last N lines, then follow new content
    fn tail_file(&self, path: &Path) -> Result<()> {
        let mut file = File::open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;

        for line in read_last_n_lines(&mut file, self.lines)? {
            println!("{line}");
        }

        // read_last_n_lines leaves the cursor at the end of the file
        let mut reader = BufReader::new(file);
        let poll_interval = Duration::from_millis(self.poll_interval);

        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => std::thread::sleep(poll_interval),
                Ok(_) => print!("{line}"),
                Err(e) => {
                    eprintln!("{}", style(format!("Error reading log file: {e}")).red());
                    anyhow::bail!("Failed to read log file");
                }
            }
        }
    }
}

/// Read the last N lines of a file, leaving the cursor at its end.
fn read_last_n_lines(file: &mut File, n: usize) -> Result<Vec<String>> {
    file.seek(SeekFrom::Start(0))?;

    let lines: Vec<String> = BufReader::new(&mut *file)
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .context("Failed to read lines from log file")?;

    file.seek(SeekFrom::End(0))?;

    let start = lines.len().saturating_sub(n);
    Ok(lines[start..].to_vec())
}
