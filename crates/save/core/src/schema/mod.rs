//! Single declaration of the save payload format.
//!
//! [`FIELDS`] lists every key the game knows about together with its JSON
//! kind, bounds, the schema version that introduced it and its default.
//! [`validate`] checks payloads against the table and [`migrate`] uses it to
//! fill in fields that older writers never produced, so neither pass keeps
//! its own copy of the format.

mod migrate;
mod validate;

pub use migrate::{MIGRATIONS, Migration, migrate};
pub use validate::validate;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::SaveConfig;

/// Version tag embedded in every payload under the `schema` key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaVersion(pub u32);

impl SchemaVersion {
    /// Version produced by this build.
    pub const CURRENT: Self = Self(3);
    /// Version assumed for payloads that carry no tag at all.
    pub const LEGACY: Self = Self(1);

    /// Reads the `schema` tag of a decoded payload, if it is a usable integer.
    pub fn of(raw: &Value) -> Option<Self> {
        raw.get("schema")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .map(Self)
    }

    pub fn is_current(self) -> bool {
        self == Self::CURRENT
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// JSON kind a field must have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
pub enum FieldKind {
    #[strum(serialize = "string")]
    String,
    #[strum(serialize = "integer")]
    Integer,
    #[strum(serialize = "number")]
    Number,
    #[strum(serialize = "array")]
    Array,
    #[strum(serialize = "object")]
    Object,
    #[strum(serialize = "object|null")]
    NullableObject,
}

impl FieldKind {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::NullableObject => value.is_object() || value.is_null(),
        }
    }
}

/// Value-level rule checked once the kind matches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Constraint {
    None,
    /// Inclusive integer range; `max: None` means unbounded above.
    Range { min: i64, max: Option<i64> },
    /// Lower bound for floating point fields.
    AtLeast { min: i64 },
    /// Inclusive character count range for strings.
    Length { min: usize, max: usize },
    /// Item cap and item kind for arrays.
    Items { max: usize, kind: FieldKind },
}

/// Value a missing optional field takes after migration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldDefault {
    /// The field has no default; a payload without it is rejected.
    Required,
    /// The field stays absent.
    Absent,
    Int(u64),
    Str(&'static str),
    Null,
    EmptyArray,
}

impl FieldDefault {
    pub fn to_value(self) -> Option<Value> {
        match self {
            Self::Required | Self::Absent => None,
            Self::Int(v) => Some(Value::from(v)),
            Self::Str(s) => Some(Value::from(s)),
            Self::Null => Some(Value::Null),
            Self::EmptyArray => Some(Value::Array(Vec::new())),
        }
    }
}

/// Declaration of one payload key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: FieldKind,
    pub constraint: Constraint,
    pub since: SchemaVersion,
    pub default: FieldDefault,
}

impl FieldSpec {
    const fn required(key: &'static str, kind: FieldKind, constraint: Constraint) -> Self {
        Self {
            key,
            kind,
            constraint,
            since: SchemaVersion(1),
            default: FieldDefault::Required,
        }
    }

    const fn optional(
        key: &'static str,
        kind: FieldKind,
        constraint: Constraint,
        since: u32,
        default: FieldDefault,
    ) -> Self {
        Self {
            key,
            kind,
            constraint,
            since: SchemaVersion(since),
            default,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self.default, FieldDefault::Required)
    }
}

const fn at_least(min: i64) -> Constraint {
    Constraint::Range { min, max: None }
}

const fn between(min: i64, max: i64) -> Constraint {
    Constraint::Range {
        min,
        max: Some(max),
    }
}

/// `<skill>_level`, `<skill>_exp` and `<skill>_exp_to_next`.
const fn skill_fields(
    level: &'static str,
    exp: &'static str,
    exp_to_next: &'static str,
    since: u32,
) -> [FieldSpec; 3] {
    [
        FieldSpec::optional(
            level,
            FieldKind::Integer,
            between(1, SaveConfig::MAX_SKILL_LEVEL),
            since,
            FieldDefault::Int(1),
        ),
        FieldSpec::optional(exp, FieldKind::Integer, at_least(0), since, FieldDefault::Int(0)),
        FieldSpec::optional(
            exp_to_next,
            FieldKind::Integer,
            at_least(1),
            since,
            FieldDefault::Int(100),
        ),
    ]
}

const FISHING: [FieldSpec; 3] =
    skill_fields("fishing_level", "fishing_exp", "fishing_exp_to_next", 2);
const COOKING: [FieldSpec; 3] =
    skill_fields("cooking_level", "cooking_exp", "cooking_exp_to_next", 2);
const MINING: [FieldSpec; 3] = skill_fields("mining_level", "mining_exp", "mining_exp_to_next", 3);

/// Every known payload key, required keys first.
pub static FIELDS: &[FieldSpec] = &[
    // ----- required -----
    FieldSpec::required(
        "name",
        FieldKind::String,
        Constraint::Length {
            min: 1,
            max: SaveConfig::MAX_PLAYER_NAME_LEN,
        },
    ),
    FieldSpec::required("level", FieldKind::Integer, between(1, SaveConfig::MAX_LEVEL)),
    FieldSpec::required("exp", FieldKind::Integer, at_least(0)),
    FieldSpec::required("exp_to_next", FieldKind::Integer, at_least(1)),
    FieldSpec::required("gold", FieldKind::Integer, at_least(0)),
    FieldSpec::required(
        "inventory",
        FieldKind::Array,
        Constraint::Items {
            max: SaveConfig::MAX_INVENTORY_ITEMS,
            kind: FieldKind::Object,
        },
    ),
    FieldSpec::required(
        "schema",
        FieldKind::Integer,
        between(1, SaveConfig::MAX_SCHEMA_TAG),
    ),
    // ----- attributes -----
    FieldSpec::optional(
        "base_hp",
        FieldKind::Integer,
        between(1, SaveConfig::MAX_ATTRIBUTE),
        1,
        FieldDefault::Int(10),
    ),
    FieldSpec::optional(
        "str",
        FieldKind::Integer,
        between(1, SaveConfig::MAX_ATTRIBUTE),
        1,
        FieldDefault::Int(10),
    ),
    FieldSpec::optional(
        "dex",
        FieldKind::Integer,
        between(1, SaveConfig::MAX_ATTRIBUTE),
        1,
        FieldDefault::Int(10),
    ),
    FieldSpec::optional(
        "agl",
        FieldKind::Integer,
        between(1, SaveConfig::MAX_ATTRIBUTE),
        1,
        FieldDefault::Int(10),
    ),
    FieldSpec::optional("stat_points", FieldKind::Integer, at_least(0), 1, FieldDefault::Int(0)),
    FieldSpec::optional("hp", FieldKind::Integer, at_least(0), 1, FieldDefault::Int(100)),
    FieldSpec::optional("max_hp", FieldKind::Integer, at_least(1), 1, FieldDefault::Int(100)),
    FieldSpec::optional("attack", FieldKind::Integer, at_least(0), 1, FieldDefault::Int(10)),
    FieldSpec::optional("defense", FieldKind::Integer, at_least(0), 1, FieldDefault::Int(5)),
    // ----- equipment -----
    FieldSpec::optional(
        "weapon",
        FieldKind::NullableObject,
        Constraint::None,
        1,
        FieldDefault::Null,
    ),
    FieldSpec::optional(
        "armor",
        FieldKind::NullableObject,
        Constraint::None,
        1,
        FieldDefault::Null,
    ),
    FieldSpec::optional("tool", FieldKind::NullableObject, Constraint::None, 2, FieldDefault::Null),
    // ----- tracking -----
    FieldSpec::optional("kill_streak", FieldKind::Integer, at_least(0), 1, FieldDefault::Int(0)),
    FieldSpec::optional("total_kills", FieldKind::Integer, at_least(0), 1, FieldDefault::Int(0)),
    FieldSpec::optional(
        "highest_level_enemy",
        FieldKind::Integer,
        at_least(0),
        1,
        FieldDefault::Int(0),
    ),
    FieldSpec::optional(
        "highest_tower_floor",
        FieldKind::Integer,
        at_least(0),
        1,
        FieldDefault::Int(0),
    ),
    FieldSpec::optional(
        "achievements",
        FieldKind::Array,
        Constraint::Items {
            max: SaveConfig::MAX_ACHIEVEMENTS,
            kind: FieldKind::String,
        },
        1,
        FieldDefault::EmptyArray,
    ),
    // ----- skills -----
    FISHING[0],
    FISHING[1],
    FISHING[2],
    COOKING[0],
    COOKING[1],
    COOKING[2],
    MINING[0],
    MINING[1],
    MINING[2],
    // ----- world -----
    FieldSpec::optional(
        "current_location",
        FieldKind::String,
        Constraint::Length { min: 1, max: 64 },
        2,
        FieldDefault::Str(SaveConfig::STARTING_LOCATION),
    ),
    FieldSpec::optional(
        "save_slot",
        FieldKind::String,
        Constraint::Length { min: 0, max: 50 },
        3,
        FieldDefault::Str(SaveConfig::DEFAULT_SLOT),
    ),
    FieldSpec::optional(
        "world_anchor_timestamp",
        FieldKind::Number,
        Constraint::AtLeast { min: 0 },
        3,
        FieldDefault::Absent,
    ),
];

/// Looks up the declaration of `key`.
pub fn field(key: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.key == key)
}

/// Inserts the default of every field matching `filter` that `map` lacks.
///
/// Returns the keys that were filled, in table order.
pub(crate) fn fill_defaults(
    map: &mut Map<String, Value>,
    filter: impl Fn(&FieldSpec) -> bool,
) -> Vec<&'static str> {
    let mut filled = Vec::new();
    for spec in FIELDS.iter().filter(|spec| filter(spec)) {
        if map.contains_key(spec.key) {
            continue;
        }
        if let Some(value) = spec.default.to_value() {
            map.insert(spec.key.to_string(), value);
            filled.push(spec.key);
        }
    }
    filled
}

/// JSON type name of `value`, for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
