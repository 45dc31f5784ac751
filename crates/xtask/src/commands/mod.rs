//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod clean;
mod delete;
mod import;
mod list;
mod migrate_legacy;
mod rename;
mod show;
mod tail_logs;
mod validate;

pub use clean::Clean;
pub use delete::Delete;
pub use import::Import;
pub use list::List;
pub use migrate_legacy::MigrateLegacy;
pub use rename::Rename;
pub use show::Show;
pub use tail_logs::TailLogs;
pub use validate::Validate;
