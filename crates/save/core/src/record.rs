//! Typed player snapshot exchanged between the game layer and the save engine.
//!
//! The JSON layout is flat: attribute, equipment, tracking and skill keys all
//! live at the top level of the payload. The nested structs here are
//! flattened back into that layout by serde. Keys the build does not know
//! about are kept in [`SaveRecord::extra`] and written back unchanged.
//!
//! Defaults are not declared here; they come from [`crate::schema::FIELDS`]
//! via [`crate::migrate`], which every decoded record goes through.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::SaveConfig;
use crate::error::ValidationError;
use crate::schema::{self, SchemaVersion};

/// Inventory entries and equipment are opaque JSON objects owned by the
/// gameplay layer.
pub type Item = Map<String, Value>;

/// Snapshot of one character as stored in a slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub name: String,
    pub level: u32,
    pub exp: u64,
    pub exp_to_next: u64,
    pub gold: u64,
    pub inventory: Vec<Item>,
    pub schema: SchemaVersion,

    #[serde(flatten)]
    pub attributes: Attributes,
    #[serde(flatten)]
    pub equipment: Equipment,
    #[serde(flatten)]
    pub tracking: TrackingStats,
    #[serde(flatten)]
    pub skills: Skills,

    pub current_location: String,
    /// Slot this record was last saved to.
    pub save_slot: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_anchor_timestamp: Option<f64>,

    /// Keys unknown to this build.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub base_hp: u32,
    #[serde(rename = "str")]
    pub strength: u32,
    #[serde(rename = "dex")]
    pub dexterity: u32,
    #[serde(rename = "agl")]
    pub agility: u32,
    pub stat_points: u64,
    pub hp: u64,
    pub max_hp: u64,
    pub attack: u64,
    pub defense: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub tool: Option<Item>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingStats {
    pub kill_streak: u64,
    pub total_kills: u64,
    pub highest_level_enemy: u64,
    pub highest_tower_floor: u64,
    pub achievements: Vec<String>,
}

/// Gathering skills, stored as `<skill>_level`, `<skill>_exp` and
/// `<skill>_exp_to_next` keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    pub fishing_level: u32,
    pub fishing_exp: u64,
    pub fishing_exp_to_next: u64,
    pub cooking_level: u32,
    pub cooking_exp: u64,
    pub cooking_exp_to_next: u64,
    pub mining_level: u32,
    pub mining_exp: u64,
    pub mining_exp_to_next: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Skill {
    Fishing,
    Cooking,
    Mining,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkillProgress {
    pub level: u32,
    pub exp: u64,
    pub exp_to_next: u64,
}

impl Skills {
    pub fn progress(&self, skill: Skill) -> SkillProgress {
        let (level, exp, exp_to_next) = match skill {
            Skill::Fishing => (self.fishing_level, self.fishing_exp, self.fishing_exp_to_next),
            Skill::Cooking => (self.cooking_level, self.cooking_exp, self.cooking_exp_to_next),
            Skill::Mining => (self.mining_level, self.mining_exp, self.mining_exp_to_next),
        };
        SkillProgress {
            level,
            exp,
            exp_to_next,
        }
    }
}

impl SaveRecord {
    /// Fresh level-one character with every optional field at its default.
    pub fn new_character(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name: String = name.into();
        let raw = serde_json::json!({
            "name": name,
            "level": SaveConfig::STARTING_LEVEL,
            "exp": 0,
            "exp_to_next": SaveConfig::STARTING_EXP_TO_NEXT,
            "gold": SaveConfig::STARTING_GOLD,
            "inventory": [],
            "schema": SchemaVersion::CURRENT,
        });
        schema::validate(&raw)?;
        schema::migrate(raw, SchemaVersion::CURRENT)
    }

    /// Payload form of the record, as written to disk.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    #[test]
    fn new_character_uses_table_defaults() {
        let record = SaveRecord::new_character("Aria").unwrap();

        assert_eq!(record.level, 1);
        assert_eq!(record.gold, 50);
        assert_eq!(record.attributes.base_hp, 10);
        assert_eq!(record.attributes.defense, 5);
        assert_eq!(record.current_location, "eslania_city");
        assert_eq!(record.schema, SchemaVersion::CURRENT);
        for skill in Skill::iter() {
            assert_eq!(record.skills.progress(skill).level, 1);
        }
    }

    #[test]
    fn new_character_rejects_empty_name() {
        assert!(matches!(
            SaveRecord::new_character(""),
            Err(ValidationError::TooShort { field: "name", .. })
        ));
    }

    #[test]
    fn payload_layout_is_flat() {
        let record = SaveRecord::new_character("Aria").unwrap();
        let value = record.to_value().unwrap();

        assert_eq!(value["str"], json!(10));
        assert_eq!(value["fishing_level"], json!(1));
        assert_eq!(value["weapon"], Value::Null);
        assert_eq!(value["schema"], json!(3));
        assert!(value.get("attributes").is_none());
        assert!(value.get("world_anchor_timestamp").is_none());
        assert_eq!(schema::validate(&value), Ok(()));
    }

    #[test]
    fn unknown_keys_round_trip() {
        let mut value = SaveRecord::new_character("Aria").unwrap().to_value().unwrap();
        value["pet"] = json!({"species": "owl"});

        let record: SaveRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.extra.len(), 1);
        assert_eq!(record.to_value().unwrap()["pet"], json!({"species": "owl"}));
    }
}
