//! Pure save-slot logic shared by the persistence runtime and offline tools.
//!
//! `save-core` owns everything about a save that can be decided without
//! touching the disk: which slot names are safe, which payloads are
//! trustworthy, and how payloads written by older builds are upgraded.
//!
//! - [`slot`] turns arbitrary user input into a [`SlotName`]
//! - [`schema`] declares every payload field once and hosts the
//!   [`validate`] and [`migrate`] passes built on that table
//! - [`record`] is the typed [`SaveRecord`] the game layer reads and writes
pub mod config;
pub mod error;
pub mod record;
pub mod schema;
pub mod slot;

pub use config::SaveConfig;
pub use error::ValidationError;
pub use record::{
    Attributes, Equipment, Item, SaveRecord, Skill, SkillProgress, Skills, TrackingStats,
};
pub use schema::{
    FIELDS, FieldKind, FieldSpec, MIGRATIONS, Migration, SchemaVersion, migrate, validate,
};
pub use slot::{SlotName, SlotStatus, SlotSummary};
