//! Persistence configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Directory used when no home directory can be determined.
const FALLBACK_SAVE_ROOT: &str = "./save_data";

/// Settings for opening a [`crate::SaveService`].
#[derive(Clone, Debug)]
pub struct PersistenceConfig {
    pub save_root: PathBuf,
    /// Write migrated records back right after loading them.
    pub auto_resave_on_migrate: bool,
    /// Import `game_save.json` into the default slot when opening.
    pub import_legacy: bool,
    pub dev: DevFlags,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self::new(default_save_root())
    }
}

impl PersistenceConfig {
    pub fn new(save_root: impl Into<PathBuf>) -> Self {
        Self {
            save_root: save_root.into(),
            auto_resave_on_migrate: true,
            import_legacy: true,
            dev: DevFlags::default(),
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SAVE_DATA_DIR` - Save root (default: `~/.terminal_rpg`)
    /// - `AUTO_RESAVE_ON_MIGRATE` - Persist migrated saves on load (default: true)
    /// - `IMPORT_LEGACY_SAVE` - Import `game_save.json` on open (default: true)
    /// - `DEV_FAST`, `DEV_QUIET`, `NO_COLOR` - Developer flags (default: off)
    /// - `DEV_SEED` - Fixed RNG seed for the game layer
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = match lookup("SAVE_DATA_DIR").filter(|dir| !dir.trim().is_empty()) {
            Some(dir) => Self::new(dir),
            None => Self::default(),
        };

        if let Some(enable) = read_flag(&lookup, "AUTO_RESAVE_ON_MIGRATE") {
            config.auto_resave_on_migrate = enable;
        }
        if let Some(enable) = read_flag(&lookup, "IMPORT_LEGACY_SAVE") {
            config.import_legacy = enable;
        }

        config.dev = DevFlags {
            fast: read_flag(&lookup, "DEV_FAST").unwrap_or(false),
            quiet: read_flag(&lookup, "DEV_QUIET").unwrap_or(false),
            no_color: read_flag(&lookup, "NO_COLOR").unwrap_or(false),
            seed: read_env(&lookup, "DEV_SEED"),
        };

        config
    }
}

/// Developer switches for the presentation layer. The save engine itself
/// never looks at them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DevFlags {
    pub fast: bool,
    pub quiet: bool,
    pub no_color: bool,
    pub seed: Option<u64>,
}

/// `~/.terminal_rpg`, or `./save_data` without a home directory.
pub fn default_save_root() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".terminal_rpg"))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_SAVE_ROOT))
}

fn read_env<T>(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
{
    lookup(key)?.trim().parse().ok()
}

/// Boolean variable. A set variable with an unrecognized value counts as on.
fn read_flag(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    let raw = lookup(key)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "0" | "false" | "no" | "off" => Some(false),
        _ => Some(true),
    }
}
