//! Filesystem side of the save engine.
//!
//! This crate turns the pure types of `save-core` into durable save slots.
//! Consumers embed [`SaveService`] and never see files directly.
//!
//! Modules are organized by responsibility:
//! - [`api`] exposes the service and error types downstream clients use
//! - [`repository`] holds the storage contract and its file/in-memory backends
//! - [`config`] loads persistence settings from the environment
pub mod api;
pub mod config;
pub mod repository;

pub use api::{LoadNotice, LoadOutcome, RenameError, SaveService};
pub use config::{DevFlags, PersistenceConfig, default_save_root};
pub use repository::{
    CandidateError, ContainmentViolation, FileSlotRepository, InMemorySlotRepo, LegacyImport,
    LoadError, LoadSource, Loaded, PathResolver, RepositoryError, SlotPaths, SlotRepository,
    StagedWrite, WriteError, WriteStage,
};
