//! One-time import of the single-file save used before slots existed.

use std::fs;
use std::path::Path;

use save_core::{SaveConfig, SchemaVersion, SlotName};
use serde_json::Value;

use super::paths::PathResolver;
use super::writer::AtomicWriter;

/// Result of a legacy import attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LegacyImport {
    NoLegacyFile,
    /// The default slot already holds a save; the legacy file is left alone.
    SlotOccupied,
    /// Imported into the default slot. `retired` tells whether the legacy
    /// file could be renamed out of the way.
    Imported { retired: bool },
    Failed(String),
}

/// Moves `game_save.json` from the save root into the default slot.
///
/// The legacy file is only renamed after the slot write succeeded, and an
/// existing `game_save.json.old` is never overwritten.
pub fn import_legacy(resolver: &PathResolver, writer: &AtomicWriter) -> LegacyImport {
    let legacy = resolver.root().join(SaveConfig::LEGACY_SAVE_FILE);
    if !legacy.is_file() {
        return LegacyImport::NoLegacyFile;
    }

    let slot = SlotName::default();
    let paths = match resolver.resolve_strict(&slot) {
        Ok(paths) => paths,
        Err(violation) => {
            tracing::error!(
                %violation,
                "default slot escapes the save root, skipping legacy import"
            );
            return LegacyImport::Failed(violation.to_string());
        }
    };
    if paths.primary.exists() {
        tracing::info!(legacy = %legacy.display(), "default slot occupied, skipping legacy import");
        return LegacyImport::SlotOccupied;
    }

    let result = match read_legacy(&legacy) {
        Ok(mut record) => {
            record.save_slot = slot.to_string();
            writer.write(&slot, &record).map_err(|e| e.to_string())
        }
        Err(reason) => Err(reason),
    };
    if let Err(reason) = result {
        tracing::error!(legacy = %legacy.display(), %reason, "legacy save import failed");
        return LegacyImport::Failed(reason);
    }

    let retired = retire(&legacy);
    tracing::info!(%slot, retired, "imported legacy save");
    LegacyImport::Imported { retired }
}

fn read_legacy(path: &Path) -> Result<save_core::SaveRecord, String> {
    let bytes = fs::read(path).map_err(|e| format!("unreadable: {e}"))?;
    let mut raw: Value = serde_json::from_slice(&bytes).map_err(|e| format!("invalid JSON: {e}"))?;
    if let Some(map) = raw.as_object_mut() {
        map.entry("schema")
            .or_insert_with(|| Value::from(SchemaVersion::LEGACY.0));
    }
    save_core::validate(&raw).map_err(|e| e.to_string())?;
    let version = SchemaVersion::of(&raw).unwrap_or(SchemaVersion::LEGACY);
    save_core::migrate(raw, version).map_err(|e| e.to_string())
}

fn retire(legacy: &Path) -> bool {
    let retired = legacy.with_file_name(SaveConfig::LEGACY_RETIRED_FILE);
    if retired.exists() {
        tracing::warn!(
            path = %retired.display(),
            "retired legacy file already exists, keeping legacy save in place"
        );
        return false;
    }
    match fs::rename(legacy, &retired) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "could not rename legacy save");
            false
        }
    }
}
