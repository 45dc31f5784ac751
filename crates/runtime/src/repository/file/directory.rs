//! Slot discovery for selection screens.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use save_core::{SaveConfig, SlotName, SlotSummary};

use crate::repository::codec;

pub struct SlotDirectory {
    root: PathBuf,
}

impl SlotDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Every `save_<slot>.json` in the root, sorted by slot name.
    ///
    /// Temp/backup files, names that would not survive sanitization and
    /// non-files are skipped. An unparseable primary is listed as corrupted.
    /// An unreadable root yields an empty list.
    pub fn list(&self) -> Vec<SlotSummary> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    root = %self.root.display(),
                    error = %e,
                    "cannot read save directory"
                );
                return Vec::new();
            }
        };

        let mut slots: Vec<SlotSummary> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => summarize(&entry.path()),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable directory entry");
                    None
                }
            })
            .collect();
        slots.sort_by(|a, b| a.slot.cmp(&b.slot));
        slots
    }
}

fn summarize(path: &Path) -> Option<SlotSummary> {
    let file_name = path.file_name()?.to_str()?;
    let raw_slot = SaveConfig::slot_from_file_name(file_name)?;
    if !SlotName::is_canonical(raw_slot) {
        tracing::debug!(file = file_name, "ignoring save file with non-canonical slot name");
        return None;
    }

    let metadata = fs::metadata(path).ok().filter(|m| m.is_file())?;
    let saved_at = metadata.modified().ok().map(DateTime::<Utc>::from);
    let slot = SlotName::sanitize(raw_slot);

    let summary = match fs::read(path).ok().as_deref().and_then(codec::peek) {
        Some((name, level)) => SlotSummary::healthy(slot, name, level),
        None => {
            tracing::debug!(file = file_name, "listing slot as corrupted");
            SlotSummary::corrupted(slot)
        }
    };
    Some(summary.with_saved_at(saved_at))
}
