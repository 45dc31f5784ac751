//! Error types raised by slot repositories.

use std::io;
use std::path::PathBuf;

use save_core::{SlotName, ValidationError};
use thiserror::Error;

/// Errors from repository housekeeping (creating the root, deleting slots).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("refusing to touch slot files: {0}")]
    Containment(#[from] ContainmentViolation),
}

/// Step of the atomic write protocol that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum WriteStage {
    #[strum(serialize = "backup")]
    Backup,
    #[strum(serialize = "stage temp file")]
    StageTemp,
    #[strum(serialize = "commit")]
    Commit,
}

/// Why a save was not persisted. The previous primary is intact in every case.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("record failed validation: {0}")]
    InvalidRecord(#[from] ValidationError),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("refusing to write slot: {0}")]
    Containment(#[from] ContainmentViolation),

    #[error("no space left on device during {stage}")]
    StorageFull {
        stage: WriteStage,
        #[source]
        source: io::Error,
    },

    #[error("permission denied during {stage}")]
    PermissionDenied {
        stage: WriteStage,
        #[source]
        source: io::Error,
    },

    #[error("I/O error during {stage}: {source}")]
    Io {
        stage: WriteStage,
        #[source]
        source: io::Error,
    },
}

impl WriteError {
    /// Classifies an I/O failure raised at `stage`.
    pub fn io(stage: WriteStage, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::StorageFull => Self::StorageFull { stage, source },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { stage, source },
            _ => Self::Io { stage, source },
        }
    }

    pub fn stage(&self) -> Option<WriteStage> {
        match self {
            Self::StorageFull { stage, .. }
            | Self::PermissionDenied { stage, .. }
            | Self::Io { stage, .. } => Some(*stage),
            Self::InvalidRecord(_) | Self::Serialize(_) | Self::Containment(_) => None,
        }
    }
}

/// Why a single candidate file (primary or backup) was rejected.
#[derive(Debug, Error)]
pub enum CandidateError {
    #[error("missing")]
    Missing,

    #[error("unreadable: {0}")]
    Unreadable(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("rejected: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no save in slot '{slot}'")]
    NotFound { slot: SlotName },

    #[error("save in slot '{slot}' is corrupted (primary {primary}; backup {backup})")]
    Corrupted {
        slot: SlotName,
        primary: CandidateError,
        backup: CandidateError,
    },

    #[error("slot '{slot}' cannot be read safely: {violation}")]
    Unsafe {
        slot: SlotName,
        #[source]
        violation: ContainmentViolation,
    },
}

impl LoadError {
    pub fn slot(&self) -> &SlotName {
        match self {
            Self::NotFound { slot } | Self::Corrupted { slot, .. } | Self::Unsafe { slot, .. } => {
                slot
            }
        }
    }
}

/// A resolved slot path that left the save root.
#[derive(Debug, Error)]
#[error("path {path} escapes save root {root}: {reason}")]
pub struct ContainmentViolation {
    pub path: PathBuf,
    pub root: PathBuf,
    pub reason: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_classified_by_kind() {
        let full = WriteError::io(WriteStage::StageTemp, io::ErrorKind::StorageFull.into());
        assert!(matches!(full, WriteError::StorageFull { stage: WriteStage::StageTemp, .. }));

        let denied = WriteError::io(WriteStage::Commit, io::ErrorKind::PermissionDenied.into());
        assert!(matches!(denied, WriteError::PermissionDenied { .. }));
        assert_eq!(denied.stage(), Some(WriteStage::Commit));

        let other = WriteError::io(WriteStage::Backup, io::ErrorKind::Other.into());
        assert!(other.to_string().starts_with("I/O error during backup"));
    }

    #[test]
    fn corrupted_message_names_both_candidates() {
        let err = LoadError::Corrupted {
            slot: SlotName::sanitize("hero"),
            primary: CandidateError::Missing,
            backup: CandidateError::Invalid(ValidationError::MissingField { field: "name" }),
        };
        let message = err.to_string();
        assert!(message.contains("'hero'"));
        assert!(message.contains("primary missing"));
        assert!(message.contains("name"));
    }
}
