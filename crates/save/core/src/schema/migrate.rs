//! Upgrades payloads written by older builds to the current record shape.

use serde_json::{Map, Value};

use super::{SchemaVersion, fill_defaults, json_type_name};
use crate::config::SaveConfig;
use crate::error::ValidationError;
use crate::record::SaveRecord;

/// One upgrade step between adjacent schema versions.
#[derive(Clone, Copy, Debug)]
pub struct Migration {
    pub from: SchemaVersion,
    pub to: SchemaVersion,
    pub description: &'static str,
    apply: fn(&mut Map<String, Value>),
}

impl Migration {
    pub fn apply(&self, map: &mut Map<String, Value>) {
        (self.apply)(map);
    }
}

/// Upgrade steps in application order; `to` of each step is `from` of the next.
pub static MIGRATIONS: &[Migration] = &[
    Migration {
        from: SchemaVersion(1),
        to: SchemaVersion(2),
        description: "fishing/cooking progress, tool slot, current location",
        apply: v1_to_v2,
    },
    Migration {
        from: SchemaVersion(2),
        to: SchemaVersion(3),
        description: "mining progress, save slot identity",
        apply: v2_to_v3,
    },
];

fn v1_to_v2(map: &mut Map<String, Value>) {
    fill_defaults(map, |spec| spec.since == SchemaVersion(2));
}

fn v2_to_v3(map: &mut Map<String, Value>) {
    fill_defaults(map, |spec| spec.since == SchemaVersion(3));
}

/// Builds a [`SaveRecord`] from a payload tagged with `version`.
///
/// Every step whose `from` is at or after `version` runs in order, filling
/// the fields that version introduced. Fields an older writer should have
/// produced but did not are then defaulted, items without a `quantity` get
/// one, and the tag becomes `max(version, CURRENT)` so payloads from newer
/// builds keep their version.
///
/// `raw` is expected to have passed [`crate::validate`]; decoding a payload
/// that did not can fail with [`ValidationError::Decode`].
pub fn migrate(raw: Value, version: SchemaVersion) -> Result<SaveRecord, ValidationError> {
    let mut map = match raw {
        Value::Object(map) => map,
        other => {
            return Err(ValidationError::NotAnObject {
                found: json_type_name(&other),
            });
        }
    };

    for step in MIGRATIONS.iter().filter(|step| step.from >= version) {
        tracing::debug!(
            from = %step.from,
            to = %step.to,
            "applying save migration: {}",
            step.description
        );
        step.apply(&mut map);
    }

    fill_defaults(&mut map, |_| true);
    normalize_inventory(&mut map);
    normalize_location(&mut map);

    let tag = version.max(SchemaVersion::CURRENT);
    map.insert("schema".to_string(), Value::from(tag.0));

    serde_json::from_value(Value::Object(map)).map_err(|e| ValidationError::Decode(e.to_string()))
}

fn normalize_inventory(map: &mut Map<String, Value>) {
    let Some(Value::Array(items)) = map.get_mut("inventory") else {
        return;
    };
    for item in items.iter_mut().filter_map(Value::as_object_mut) {
        item.entry("quantity").or_insert_with(|| Value::from(1));
    }
}

fn normalize_location(map: &mut Map<String, Value>) {
    if let Some(location) = map.get_mut("current_location")
        && location.as_str() == Some(SaveConfig::LEGACY_TOWN_LOCATION)
    {
        *location = Value::from(SaveConfig::STARTING_LOCATION);
    }
}
