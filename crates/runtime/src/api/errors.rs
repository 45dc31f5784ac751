//! Error types surfaced by the save API.
//!
//! Repository errors are re-exported so clients can match on a single path.
use save_core::SlotName;
use thiserror::Error;

pub use crate::repository::{LoadError, RepositoryError, WriteError};

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("slot '{slot}' cannot be renamed to itself")]
    SameSlot { slot: SlotName },

    #[error("slot '{slot}' already exists")]
    TargetExists { slot: SlotName },

    #[error("slot '{slot}' resolved to slot '{actual}'")]
    Redirected { slot: SlotName, actual: SlotName },

    #[error("failed to read source slot: {0}")]
    Load(#[from] LoadError),

    #[error("failed to write target slot: {0}")]
    Write(#[from] WriteError),

    #[error("target written but source slot could not be removed: {0}")]
    Cleanup(#[from] RepositoryError),
}
