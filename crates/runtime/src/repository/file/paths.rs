//! Maps slot names to the three files a slot owns, confined to the save root.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use save_core::{SaveConfig, SlotName};

use crate::repository::error::ContainmentViolation;

/// Primary, staging and backup files of one slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotPaths {
    /// Slot the files belong to.
    pub slot: SlotName,
    pub primary: PathBuf,
    pub temp: PathBuf,
    pub backup: PathBuf,
}

impl SlotPaths {
    fn under(root: &Path, slot: &SlotName) -> Self {
        let primary = root.join(slot.file_name());
        Self {
            temp: with_suffix(&primary, SaveConfig::TEMP_SUFFIX),
            backup: with_suffix(&primary, SaveConfig::BACKUP_SUFFIX),
            primary,
            slot: slot.clone(),
        }
    }

    pub fn all(&self) -> [&Path; 3] {
        [&self.primary, &self.temp, &self.backup]
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Resolves slot files under a canonicalized save root.
#[derive(Clone, Debug)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Creates the root if needed and canonicalizes it.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root)?;
        Ok(Self {
            root: fs::canonicalize(root)?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths for exactly `slot`, or the violation if any of them leaves the
    /// root. Used by every operation that writes or removes files.
    pub fn resolve_strict(&self, slot: &SlotName) -> Result<SlotPaths, ContainmentViolation> {
        let paths = SlotPaths::under(&self.root, slot);
        self.check_containment(&paths)?;
        Ok(paths)
    }

    /// Paths to read `slot` from.
    ///
    /// If any of them would leave the root (which sanitized names cannot do
    /// lexically, but a planted symlink can), the violation is logged and the
    /// default slot's paths are used instead, provided those are contained.
    /// Check [`SlotPaths::slot`] to see which slot was resolved.
    pub fn resolve(&self, slot: &SlotName) -> Result<SlotPaths, ContainmentViolation> {
        let violation = match self.resolve_strict(slot) {
            Ok(paths) => return Ok(paths),
            Err(violation) => violation,
        };
        tracing::error!(%slot, %violation, "save path containment failed");
        if slot.is_default() {
            return Err(violation);
        }
        let fallback = self.resolve_strict(&SlotName::default()).inspect_err(|e| {
            tracing::error!(violation = %e, "default slot escapes the save root too");
        })?;
        tracing::warn!(%slot, "reading default slot instead");
        Ok(fallback)
    }

    /// Verifies that every path of `paths` sits directly inside the root.
    ///
    /// The lexical check requires exactly one normal component below the
    /// root. Paths that already exist are also canonicalized so symlinks
    /// pointing elsewhere are caught.
    pub fn check_containment(&self, paths: &SlotPaths) -> Result<(), ContainmentViolation> {
        paths.all().into_iter().try_for_each(|path| self.contains(path))
    }

    fn contains(&self, path: &Path) -> Result<(), ContainmentViolation> {
        let violation = |reason| ContainmentViolation {
            path: path.to_path_buf(),
            root: self.root.clone(),
            reason,
        };

        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| violation("not under root"))?;
        let mut components = relative.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(violation("not a single file name")),
        }

        if fs::symlink_metadata(path).is_err() {
            return Ok(());
        }
        let resolved = fs::canonicalize(path).map_err(|_| violation("dangling link"))?;
        if resolved.parent() != Some(self.root.as_path()) {
            return Err(violation("resolves outside root"));
        }
        Ok(())
    }
}
