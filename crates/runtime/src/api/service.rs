//! Consumer-facing save/load operations.

use std::fmt;

use save_core::{SaveRecord, SchemaVersion, SlotName, SlotSummary};

use super::errors::{LoadError, RenameError, RepositoryError, WriteError};
use crate::config::PersistenceConfig;
use crate::repository::{FileSlotRepository, LegacyImport, SlotRepository};

/// Something the player should be told about after a successful load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadNotice {
    BackupRestored,
    Migrated {
        from: SchemaVersion,
        to: SchemaVersion,
    },
    /// The migrated record could not be written back; it will be migrated
    /// again next time.
    ResaveFailed(String),
}

impl fmt::Display for LoadNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackupRestored => {
                f.write_str("Main save file was corrupted; restored from backup.")
            }
            Self::Migrated { from, to } => write!(f, "Save upgraded from {from} to {to}."),
            Self::ResaveFailed(reason) => {
                write!(f, "Upgraded save could not be written back: {reason}")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadOutcome {
    pub slot: SlotName,
    pub record: SaveRecord,
    pub notices: Vec<LoadNotice>,
}

impl LoadOutcome {
    pub fn restored_from_backup(&self) -> bool {
        self.notices.contains(&LoadNotice::BackupRestored)
    }
}

/// Save slots as seen by the game layer.
///
/// Every method takes raw, user-typed slot names and sanitizes them first.
pub struct SaveService<R = FileSlotRepository> {
    repo: R,
    auto_resave_on_migrate: bool,
}

impl SaveService<FileSlotRepository> {
    /// Opens the configured save root, running the legacy import if enabled.
    pub fn open(config: &PersistenceConfig) -> Result<Self, RepositoryError> {
        let repo = FileSlotRepository::new(&config.save_root)?;
        if config.import_legacy {
            match repo.import_legacy() {
                LegacyImport::NoLegacyFile => {}
                outcome => tracing::info!(?outcome, "legacy save import"),
            }
        }
        Ok(Self::new(repo).with_auto_resave(config.auto_resave_on_migrate))
    }
}

impl<R: SlotRepository> SaveService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            auto_resave_on_migrate: true,
        }
    }

    pub fn with_auto_resave(mut self, enabled: bool) -> Self {
        self.auto_resave_on_migrate = enabled;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Writes `record` into `slot`. The stored copy's `save_slot` is the
    /// sanitized slot name.
    pub fn save(&self, record: &SaveRecord, slot: &str) -> Result<SlotName, WriteError> {
        let slot = SlotName::sanitize(slot);
        let mut snapshot = record.clone();
        snapshot.save_slot = slot.to_string();
        self.repo.save(&slot, &snapshot)?;
        Ok(slot)
    }

    /// Loads `slot`, reporting backup recovery and migration as notices.
    ///
    /// [`LoadOutcome::slot`] is the slot actually read, which is the default
    /// slot when the requested one could not be read safely.
    ///
    /// A migrated record is written back when auto-resave is on; failing to
    /// do so does not fail the load.
    pub fn load(&self, slot: &str) -> Result<LoadOutcome, LoadError> {
        let requested = SlotName::sanitize(slot);
        let loaded = self.repo.load(&requested)?;
        let slot = loaded.slot.clone();

        let mut notices = Vec::new();
        if loaded.from_backup() {
            notices.push(LoadNotice::BackupRestored);
        }
        if let Some(from) = loaded.migrated_from {
            notices.push(LoadNotice::Migrated {
                from,
                to: loaded.record.schema,
            });
            if self.auto_resave_on_migrate
                && let Err(err) = self.repo.save(&slot, &loaded.record)
            {
                tracing::warn!(%slot, error = %err, "could not persist migrated save");
                notices.push(LoadNotice::ResaveFailed(err.to_string()));
            }
        }

        Ok(LoadOutcome {
            slot,
            record: loaded.record,
            notices,
        })
    }

    /// The record in `slot`, or `None` when it is missing or unrecoverable.
    pub fn load_player(&self, slot: &str) -> Option<SaveRecord> {
        match self.load(slot) {
            Ok(outcome) => Some(outcome.record),
            Err(LoadError::NotFound { .. }) => None,
            Err(err) => {
                tracing::warn!(error = %err, "no usable save");
                None
            }
        }
    }

    pub fn list_slots(&self) -> Vec<SlotSummary> {
        self.repo.list()
    }

    pub fn slot_exists(&self, slot: &str) -> bool {
        self.repo.exists(&SlotName::sanitize(slot))
    }

    pub fn delete_slot(&self, slot: &str) -> Result<bool, RepositoryError> {
        self.repo.delete(&SlotName::sanitize(slot))
    }

    /// Moves a save to a new slot name.
    ///
    /// The target is written before the source is deleted, so a failure
    /// part-way leaves at least one copy. A source that could only be read
    /// through the default slot is refused.
    pub fn rename_slot(&self, old: &str, new: &str) -> Result<SlotName, RenameError> {
        let old = SlotName::sanitize(old);
        let new = SlotName::sanitize(new);
        if old == new {
            return Err(RenameError::SameSlot { slot: old });
        }
        if self.repo.exists(&new) {
            return Err(RenameError::TargetExists { slot: new });
        }

        let loaded = self.repo.load(&old)?;
        if loaded.slot != old {
            return Err(RenameError::Redirected {
                slot: old,
                actual: loaded.slot,
            });
        }
        let mut record = loaded.record;
        record.save_slot = new.to_string();
        self.repo.save(&new, &record)?;
        self.repo.delete(&old)?;

        tracing::info!(from = %old, to = %new, "renamed slot");
        Ok(new)
    }
}
