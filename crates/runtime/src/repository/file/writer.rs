//! Crash-safe slot writes.
//!
//! A write runs in three steps:
//! 1. copy the current primary (if any) to the backup file
//! 2. write the new payload to the temp file and fsync it
//! 3. rename the temp file over the primary
//!
//! Interrupting at any point leaves either the old or the new primary in
//! place, never a truncated one. Steps 1-2 are exposed as
//! [`AtomicWriter::stage`] so callers (and tests) can hold a staged write
//! before committing it.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use save_core::{SaveRecord, SlotName};

use super::paths::{PathResolver, SlotPaths};
use crate::repository::codec;
use crate::repository::error::{WriteError, WriteStage};

pub struct AtomicWriter {
    resolver: PathResolver,
}

impl AtomicWriter {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    /// Validates, backs up and stages `record` without touching the primary.
    ///
    /// A slot whose files leave the save root is refused outright; nothing is
    /// redirected to another slot. On error the temp file is removed again.
    pub fn stage(&self, slot: &SlotName, record: &SaveRecord) -> Result<StagedWrite, WriteError> {
        let bytes = codec::encode(record)?;
        let paths = self.resolver.resolve_strict(slot)?;

        let staged = backup_primary(&paths).and_then(|_| stage_temp(&paths, &bytes));
        if staged.is_err() {
            discard(&paths.temp);
        }
        staged
    }

    /// Full write: [`stage`](Self::stage) then [`StagedWrite::commit`].
    pub fn write(&self, slot: &SlotName, record: &SaveRecord) -> Result<(), WriteError> {
        let result = self.stage(slot, record).and_then(StagedWrite::commit);

        match &result {
            Ok(()) => tracing::debug!(%slot, "saved slot"),
            Err(err) => tracing::error!(%slot, error = %err, "failed to save slot"),
        }
        result
    }
}

/// Copies the primary to the backup file. Returns whether a primary existed.
fn backup_primary(paths: &SlotPaths) -> Result<bool, WriteError> {
    if !paths.primary.exists() {
        return Ok(false);
    }
    let io_err = |e| WriteError::io(WriteStage::Backup, e);
    // fs::copy cannot open a read-only destination, and copies the primary's
    // mode onto the backup.
    match fs::remove_file(&paths.backup) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(io_err(e)),
    }
    fs::copy(&paths.primary, &paths.backup).map_err(io_err)?;
    File::open(&paths.backup)
        .and_then(|file| file.sync_all())
        .map_err(io_err)?;
    tracing::trace!(backup = %paths.backup.display(), "backed up previous save");
    Ok(true)
}

fn stage_temp(paths: &SlotPaths, bytes: &[u8]) -> Result<StagedWrite, WriteError> {
    let write = || -> io::Result<()> {
        let mut file = File::create(&paths.temp)?;
        file.write_all(bytes)?;
        file.sync_all()
    };
    write().map_err(|e| WriteError::io(WriteStage::StageTemp, e))?;

    Ok(StagedWrite {
        temp: paths.temp.clone(),
        primary: paths.primary.clone(),
    })
}

fn discard(temp: &Path) {
    match fs::remove_file(temp) {
        Ok(()) => tracing::debug!(temp = %temp.display(), "removed leftover temp file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(temp = %temp.display(), error = %e, "could not remove temp file"),
    }
}

/// A fully written and synced temp file waiting to replace the primary.
///
/// Dropping it without committing leaves the primary untouched; the stale
/// temp file is overwritten by the next write to the slot.
#[must_use = "the primary is only replaced by commit()"]
#[derive(Debug)]
pub struct StagedWrite {
    temp: PathBuf,
    primary: PathBuf,
}

impl StagedWrite {
    pub fn temp_path(&self) -> &Path {
        &self.temp
    }

    /// Atomically replaces the primary with the staged file. The temp file
    /// is removed if the rename fails.
    pub fn commit(self) -> Result<(), WriteError> {
        if let Err(e) = fs::rename(&self.temp, &self.primary) {
            discard(&self.temp);
            return Err(WriteError::io(WriteStage::Commit, e));
        }
        sync_parent_dir(&self.primary);
        Ok(())
    }
}

/// Makes the rename durable. Best effort: not every platform can open a
/// directory for syncing.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = File::open(parent).and_then(|dir| dir.sync_all())
    {
        tracing::debug!(dir = %parent.display(), error = %e, "directory fsync failed");
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathResolver, AtomicWriter) {
        let dir = TempDir::new().unwrap();
        let resolver = PathResolver::new(dir.path()).unwrap();
        let writer = AtomicWriter::new(resolver.clone());
        (dir, resolver, writer)
    }

    fn record(name: &str) -> SaveRecord {
        SaveRecord::new_character(name).unwrap()
    }

    #[test]
    fn first_write_creates_primary_without_backup() {
        let (_dir, resolver, writer) = setup();
        let slot = SlotName::sanitize("hero");

        writer.write(&slot, &record("Aria")).unwrap();

        let paths = resolver.resolve(&slot).unwrap();
        assert!(paths.primary.exists());
        assert!(!paths.backup.exists());
        assert!(!paths.temp.exists());
    }

    #[test]
    fn overwrite_moves_previous_content_to_backup() {
        let (_dir, resolver, writer) = setup();
        let slot = SlotName::sanitize("hero");
        let paths = resolver.resolve(&slot).unwrap();

        writer.write(&slot, &record("First")).unwrap();
        let first = fs::read(&paths.primary).unwrap();
        writer.write(&slot, &record("Second")).unwrap();

        assert_eq!(fs::read(&paths.backup).unwrap(), first);
        assert!(String::from_utf8(fs::read(&paths.primary).unwrap()).unwrap().contains("Second"));
    }

    #[test]
    fn invalid_record_touches_nothing() {
        let (_dir, resolver, writer) = setup();
        let slot = SlotName::sanitize("hero");
        writer.write(&slot, &record("Aria")).unwrap();
        let paths = resolver.resolve(&slot).unwrap();
        let before = fs::read(&paths.primary).unwrap();

        let mut bad = record("Aria");
        bad.name.clear();
        assert!(matches!(writer.write(&slot, &bad), Err(WriteError::InvalidRecord(_))));

        assert_eq!(fs::read(&paths.primary).unwrap(), before);
        assert!(!paths.backup.exists());
        assert!(!paths.temp.exists());
    }

    #[test]
    fn staged_write_leaves_primary_alone_until_commit() {
        let (_dir, resolver, writer) = setup();
        let slot = SlotName::sanitize("hero");
        let paths = resolver.resolve(&slot).unwrap();
        writer.write(&slot, &record("Old")).unwrap();
        let old = fs::read(&paths.primary).unwrap();

        let staged = writer.stage(&slot, &record("New")).unwrap();
        assert!(staged.temp_path().exists());
        assert_eq!(fs::read(&paths.primary).unwrap(), old);

        staged.commit().unwrap();
        assert!(!paths.temp.exists());
        assert_ne!(fs::read(&paths.primary).unwrap(), old);
    }

    #[test]
    fn temp_failure_keeps_primary_and_reports_stage() {
        let (_dir, resolver, writer) = setup();
        let slot = SlotName::sanitize("hero");
        let paths = resolver.resolve(&slot).unwrap();
        writer.write(&slot, &record("Old")).unwrap();
        let before = fs::read(&paths.primary).unwrap();
        fs::create_dir(&paths.temp).unwrap();

        let err = writer.write(&slot, &record("New")).unwrap_err();

        assert_eq!(err.stage(), Some(WriteStage::StageTemp));
        assert_eq!(fs::read(&paths.primary).unwrap(), before);
        assert!(!paths.temp.is_file());
    }

    #[test]
    fn backup_failure_keeps_primary_and_reports_stage() {
        let (_dir, resolver, writer) = setup();
        let slot = SlotName::sanitize("hero");
        let paths = resolver.resolve(&slot).unwrap();
        writer.write(&slot, &record("Old")).unwrap();
        let before = fs::read(&paths.primary).unwrap();
        fs::create_dir(&paths.backup).unwrap();
        fs::write(paths.backup.join("keep"), b"x").unwrap();

        let err = writer.write(&slot, &record("New")).unwrap_err();

        assert_eq!(err.stage(), Some(WriteStage::Backup));
        assert_eq!(fs::read(&paths.primary).unwrap(), before);
        assert!(!paths.temp.exists());
        assert!(paths.backup.join("keep").is_file());
    }

    #[test]
    fn commit_failure_removes_temp_and_reports_stage() {
        let (_dir, resolver, writer) = setup();
        let slot = SlotName::sanitize("hero");
        let paths = resolver.resolve(&slot).unwrap();

        let staged = writer.stage(&slot, &record("New")).unwrap();
        fs::create_dir(&paths.primary).unwrap();
        fs::write(paths.primary.join("occupied"), b"x").unwrap();
        let err = staged.commit().unwrap_err();

        assert_eq!(err.stage(), Some(WriteStage::Commit));
        assert!(!paths.temp.exists());
        assert_eq!(fs::read(paths.primary.join("occupied")).unwrap(), b"x");
    }

    #[cfg(unix)]
    #[test]
    fn read_only_primary_can_still_be_backed_up() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, resolver, writer) = setup();
        let slot = SlotName::sanitize("hero");
        let paths = resolver.resolve(&slot).unwrap();
        writer.write(&slot, &record("First")).unwrap();
        let first = fs::read(&paths.primary).unwrap();
        fs::set_permissions(&paths.primary, fs::Permissions::from_mode(0o444)).unwrap();

        writer.write(&slot, &record("Second")).unwrap();
        fs::set_permissions(&paths.primary, fs::Permissions::from_mode(0o444)).unwrap();
        writer.write(&slot, &record("Third")).unwrap();

        assert!(String::from_utf8(fs::read(&paths.backup).unwrap()).unwrap().contains("Second"));
        assert_ne!(fs::read(&paths.backup).unwrap(), first);
    }

    #[cfg(unix)]
    #[test]
    fn escaping_backup_link_is_never_written() {
        let (_dir, resolver, writer) = setup();
        let slot = SlotName::default();
        writer.write(&slot, &record("Main")).unwrap();
        let elsewhere = TempDir::new().unwrap();
        let victim = elsewhere.path().join("victim.txt");
        fs::write(&victim, b"untouched").unwrap();
        std::os::unix::fs::symlink(&victim, resolver.root().join("save_main.json.bak")).unwrap();

        let err = writer.write(&slot, &record("Again")).unwrap_err();

        assert!(matches!(err, WriteError::Containment(_)));
        assert_eq!(fs::read(&victim).unwrap(), b"untouched");
    }
}
