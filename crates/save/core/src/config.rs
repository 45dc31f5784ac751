/// Save format constants shared by the validator, migrator and runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaveConfig;

impl SaveConfig {
    // ===== slot naming =====
    /// Slot used when a requested name sanitizes to nothing usable.
    pub const DEFAULT_SLOT: &'static str = "main";
    /// Maximum slot name length, in characters.
    pub const MAX_SLOT_NAME_LEN: usize = 30;

    // ===== file naming =====
    pub const SLOT_FILE_PREFIX: &'static str = "save_";
    pub const SLOT_FILE_SUFFIX: &'static str = ".json";
    pub const TEMP_SUFFIX: &'static str = ".tmp";
    pub const BACKUP_SUFFIX: &'static str = ".bak";
    /// Single-slot file written by builds that predate named slots.
    pub const LEGACY_SAVE_FILE: &'static str = "game_save.json";
    /// Name the legacy file is moved to once imported.
    pub const LEGACY_RETIRED_FILE: &'static str = "game_save.json.old";

    // ===== payload limits =====
    pub const MAX_PLAYER_NAME_LEN: usize = 50;
    pub const MAX_LEVEL: i64 = 100;
    pub const MAX_INVENTORY_ITEMS: usize = 1000;
    pub const MAX_ACHIEVEMENTS: usize = 1000;
    pub const MAX_ATTRIBUTE: i64 = 1000;
    pub const MAX_SKILL_LEVEL: i64 = 99;
    /// Highest schema tag a payload may carry, newer builds included.
    pub const MAX_SCHEMA_TAG: i64 = 100;

    // ===== new character defaults =====
    pub const STARTING_LEVEL: u32 = 1;
    pub const STARTING_EXP_TO_NEXT: u64 = 100;
    pub const STARTING_GOLD: u64 = 50;
    pub const STARTING_LOCATION: &'static str = "eslania_city";
    /// Location id used by schema v1 saves for the starting city.
    pub const LEGACY_TOWN_LOCATION: &'static str = "town";

    /// File name of a slot's primary save.
    pub fn primary_file_name(slot: &str) -> String {
        format!("{}{}{}", Self::SLOT_FILE_PREFIX, slot, Self::SLOT_FILE_SUFFIX)
    }

    /// Extracts the slot part of a primary file name (`save_<slot>.json`).
    ///
    /// Temp and backup files do not match.
    pub fn slot_from_file_name(file_name: &str) -> Option<&str> {
        file_name
            .strip_prefix(Self::SLOT_FILE_PREFIX)?
            .strip_suffix(Self::SLOT_FILE_SUFFIX)
            .filter(|slot| !slot.is_empty())
    }
}
