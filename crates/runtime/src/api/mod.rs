//! Public save API surface.
//!
//! The game and UI layers only talk to [`SaveService`]; repositories stay an
//! implementation detail they can swap for tests.

pub mod errors;
pub mod service;

pub use errors::RenameError;
pub use service::{LoadNotice, LoadOutcome, SaveService};
