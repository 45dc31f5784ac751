//! File-based slot repository.
//!
//! Each slot owns up to three files in the save root:
//! `save_<slot>.json` (primary), `save_<slot>.json.tmp` (staging) and
//! `save_<slot>.json.bak` (previous primary).

mod directory;
mod legacy;
mod loader;
mod paths;
mod writer;

use std::fs;
use std::io;
use std::path::Path;

use save_core::{SaveRecord, SlotName, SlotSummary};

pub use directory::SlotDirectory;
pub use legacy::{LegacyImport, import_legacy};
pub use loader::SlotLoader;
pub use paths::{PathResolver, SlotPaths};
pub use writer::{AtomicWriter, StagedWrite};

use crate::repository::error::ContainmentViolation;
use crate::repository::{LoadError, Loaded, RepositoryError, SlotRepository, WriteError};

/// Slots stored as JSON files under one directory.
pub struct FileSlotRepository {
    resolver: PathResolver,
    writer: AtomicWriter,
    loader: SlotLoader,
    directory: SlotDirectory,
}

impl FileSlotRepository {
    /// Opens (creating if needed) the save root.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let resolver = PathResolver::new(root)?;
        tracing::debug!(root = %resolver.root().display(), "opened save root");
        Ok(Self {
            writer: AtomicWriter::new(resolver.clone()),
            loader: SlotLoader::new(resolver.clone()),
            directory: SlotDirectory::new(resolver.root()),
            resolver,
        })
    }

    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    /// The files `slot` owns, if they all stay inside the root.
    pub fn paths(&self, slot: &SlotName) -> Result<SlotPaths, ContainmentViolation> {
        self.resolver.resolve_strict(slot)
    }

    pub fn writer(&self) -> &AtomicWriter {
        &self.writer
    }

    pub fn import_legacy(&self) -> LegacyImport {
        import_legacy(&self.resolver, &self.writer)
    }
}

impl SlotRepository for FileSlotRepository {
    fn save(&self, slot: &SlotName, record: &SaveRecord) -> Result<(), WriteError> {
        self.writer.write(slot, record)
    }

    fn load(&self, slot: &SlotName) -> Result<Loaded, LoadError> {
        self.loader.load(slot)
    }

    fn list(&self) -> Vec<SlotSummary> {
        self.directory.list()
    }

    fn delete(&self, slot: &SlotName) -> Result<bool, RepositoryError> {
        let paths = self.resolver.resolve_strict(slot).inspect_err(|violation| {
            tracing::error!(%slot, %violation, "refusing to delete slot");
        })?;
        let mut removed = false;
        for path in paths.all() {
            match fs::remove_file(path) {
                Ok(()) => removed = true,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        if removed {
            tracing::info!(%slot, "deleted slot");
        }
        Ok(removed)
    }

    fn exists(&self, slot: &SlotName) -> bool {
        self.resolver
            .resolve_strict(slot)
            .is_ok_and(|paths| paths.primary.is_file())
    }
}
