//! Byte-level encoding shared by every repository backend.

use save_core::{SaveRecord, SchemaVersion, SlotName};
use serde_json::Value;

use crate::repository::error::{CandidateError, LoadError, WriteError};
use crate::repository::traits::{LoadSource, Loaded};

/// Serializes a record after checking it against the schema.
///
/// A record that would not load back is never written.
pub(crate) fn encode(record: &SaveRecord) -> Result<Vec<u8>, WriteError> {
    let value = record.to_value()?;
    save_core::validate(&value)?;
    let mut bytes = serde_json::to_vec_pretty(&value)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// A candidate that parsed, validated and migrated.
#[derive(Debug)]
pub(crate) struct Decoded {
    pub record: SaveRecord,
    pub version: SchemaVersion,
}

pub(crate) fn decode(bytes: &[u8]) -> Result<Decoded, CandidateError> {
    let raw: Value = serde_json::from_slice(bytes)?;
    save_core::validate(&raw)?;
    let version = SchemaVersion::of(&raw).unwrap_or(SchemaVersion::LEGACY);
    let record = save_core::migrate(raw, version)?;
    Ok(Decoded { record, version })
}

/// Name and level for listings, without full validation.
pub(crate) fn peek(bytes: &[u8]) -> Option<(String, u32)> {
    let raw: Value = serde_json::from_slice(bytes).ok()?;
    let name = raw.get("name")?.as_str()?.to_string();
    let level = u32::try_from(raw.get("level")?.as_u64()?).ok()?;
    Some((name, level))
}

/// Primary first, then backup, otherwise a corrupted slot.
///
/// `backup` is only consulted when the primary is rejected.
pub(crate) fn load_with_fallback(
    slot: &SlotName,
    primary: Result<Decoded, CandidateError>,
    backup: impl FnOnce() -> Result<Decoded, CandidateError>,
) -> Result<Loaded, LoadError> {
    let primary_err = match primary {
        Ok(decoded) => return Ok(loaded(slot, decoded, LoadSource::Primary)),
        Err(err) => err,
    };
    tracing::warn!(%slot, error = %primary_err, "primary save rejected, trying backup");

    match backup() {
        Ok(decoded) => {
            tracing::warn!(%slot, "restored save from backup");
            Ok(loaded(slot, decoded, LoadSource::Backup))
        }
        Err(backup_err) => {
            tracing::error!(
                %slot,
                primary = %primary_err,
                backup = %backup_err,
                "save slot is unrecoverable"
            );
            Err(LoadError::Corrupted {
                slot: slot.clone(),
                primary: primary_err,
                backup: backup_err,
            })
        }
    }
}

fn loaded(slot: &SlotName, decoded: Decoded, source: LoadSource) -> Loaded {
    let migrated_from = (decoded.version < SchemaVersion::CURRENT).then_some(decoded.version);
    if let Some(from) = migrated_from {
        tracing::info!(%slot, %from, to = %decoded.record.schema, "migrated save");
    }
    tracing::debug!(%slot, %source, "loaded save");
    Loaded {
        slot: slot.clone(),
        record: decoded.record,
        source,
        migrated_from,
    }
}
