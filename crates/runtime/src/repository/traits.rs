//! Repository contract for save slots.

use save_core::{SaveRecord, SchemaVersion, SlotName, SlotSummary};

use crate::repository::error::{LoadError, RepositoryError, WriteError};

/// Which file a record was recovered from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LoadSource {
    Primary,
    Backup,
}

/// A record read from a slot, with how it got there.
#[derive(Clone, Debug, PartialEq)]
pub struct Loaded {
    /// Slot the record was read from. Differs from the requested slot only
    /// when the file backend had to fall back to the default slot.
    pub slot: SlotName,
    pub record: SaveRecord,
    pub source: LoadSource,
    /// Version the payload carried before migration, when it was older than
    /// the current one.
    pub migrated_from: Option<SchemaVersion>,
}

impl Loaded {
    pub fn from_backup(&self) -> bool {
        self.source == LoadSource::Backup
    }
}

/// Storage of save slots.
///
/// Implementations never write a record that fails validation and never
/// leave a slot without a readable copy after a failed write. Slot names are
/// already sanitized by the time they get here.
pub trait SlotRepository: Send + Sync {
    /// Persist `record` into `slot`, keeping the previous content as backup.
    fn save(&self, slot: &SlotName, record: &SaveRecord) -> Result<(), WriteError>;

    /// Read `slot`, falling back to its backup when the primary is rejected.
    ///
    /// Loading does not write anything.
    fn load(&self, slot: &SlotName) -> Result<Loaded, LoadError>;

    /// Summaries of every slot, ordered by slot name.
    fn list(&self) -> Vec<SlotSummary>;

    /// Remove every file of `slot`. Returns whether anything existed.
    fn delete(&self, slot: &SlotName) -> Result<bool, RepositoryError>;

    fn exists(&self, slot: &SlotName) -> bool;
}
