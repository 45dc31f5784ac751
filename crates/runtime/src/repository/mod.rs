//! Repository layer for save slots.
//!
//! [`SlotRepository`] is the storage contract; [`FileSlotRepository`] is the
//! real backend and [`InMemorySlotRepo`] a byte-compatible stand-in for
//! tests and tools. Both share the same codec, so a record that round-trips
//! through one round-trips through the other.

mod codec;
mod error;
pub mod file;
mod memory;
mod traits;

pub use error::{
    CandidateError, ContainmentViolation, LoadError, RepositoryError, WriteError, WriteStage,
};
pub use file::{FileSlotRepository, LegacyImport, PathResolver, SlotPaths, StagedWrite};
pub use memory::InMemorySlotRepo;
pub use traits::{LoadSource, Loaded, SlotRepository};
