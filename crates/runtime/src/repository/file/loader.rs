use std::fs;
use std::io;
use std::path::Path;

use save_core::SlotName;

use super::paths::PathResolver;
use crate::repository::codec::{self, Decoded};
use crate::repository::error::{CandidateError, LoadError};
use crate::repository::traits::Loaded;

/// Reads slots from disk with backup fallback. Never writes.
pub struct SlotLoader {
    resolver: PathResolver,
}

impl SlotLoader {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// A slot without a primary file does not exist, even if a stray backup
    /// is still around.
    pub fn load(&self, slot: &SlotName) -> Result<Loaded, LoadError> {
        let paths = self.resolver.resolve(slot).map_err(|violation| LoadError::Unsafe {
            slot: slot.clone(),
            violation,
        })?;
        if !paths.primary.exists() {
            return Err(LoadError::NotFound { slot: slot.clone() });
        }
        codec::load_with_fallback(&paths.slot, read_candidate(&paths.primary), || {
            read_candidate(&paths.backup)
        })
    }
}

fn read_candidate(path: &Path) -> Result<Decoded, CandidateError> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CandidateError::Missing,
        _ => CandidateError::Unreadable(e),
    })?;
    codec::decode(&bytes)
}
