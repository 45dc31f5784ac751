//! Structural validation of decoded payloads.

use serde_json::{Map, Value};

use super::{Constraint, FIELDS, FieldSpec, json_type_name};
use crate::error::ValidationError;

/// Checks `raw` against [`FIELDS`], returning the first violation found.
///
/// Order: the payload must be an object, every required key must be present,
/// then each known key present in the payload is checked for kind and for its
/// constraint (numeric range, string length, array size and item kind), in
/// table order. Keys missing from the table are accepted untouched so saves
/// written by newer builds still load.
pub fn validate(raw: &Value) -> Result<(), ValidationError> {
    let map = raw.as_object().ok_or(ValidationError::NotAnObject {
        found: json_type_name(raw),
    })?;

    if let Some(missing) = FIELDS
        .iter()
        .find(|spec| spec.is_required() && !map.contains_key(spec.key))
    {
        return Err(ValidationError::MissingField { field: missing.key });
    }

    FIELDS
        .iter()
        .try_for_each(|spec| check_field(spec, map))
}

fn check_field(spec: &FieldSpec, map: &Map<String, Value>) -> Result<(), ValidationError> {
    let Some(value) = map.get(spec.key) else {
        return Ok(());
    };

    if !spec.kind.matches(value) {
        return Err(ValidationError::WrongType {
            field: spec.key,
            expected: spec.kind,
            found: json_type_name(value),
        });
    }

    match spec.constraint {
        Constraint::None => Ok(()),
        Constraint::Range { min, max } => check_range(spec.key, value, min, max),
        Constraint::AtLeast { min } => check_at_least(spec.key, value, min),
        Constraint::Length { min, max } => {
            let len = value.as_str().map_or(0, |s| s.chars().count());
            if len < min {
                Err(ValidationError::TooShort {
                    field: spec.key,
                    len,
                    min,
                })
            } else if len > max {
                Err(ValidationError::TooLong {
                    field: spec.key,
                    len,
                    max,
                })
            } else {
                Ok(())
            }
        }
        Constraint::Items { max, kind } => {
            let items = value.as_array().map(Vec::as_slice).unwrap_or_default();
            if items.len() > max {
                return Err(ValidationError::TooManyItems {
                    field: spec.key,
                    len: items.len(),
                    max,
                });
            }
            match items.iter().position(|item| !kind.matches(item)) {
                Some(index) => Err(ValidationError::ItemWrongType {
                    field: spec.key,
                    index,
                    expected: kind,
                    found: json_type_name(&items[index]),
                }),
                None => Ok(()),
            }
        }
    }
}

fn check_range(
    field: &'static str,
    value: &Value,
    min: i64,
    max: Option<i64>,
) -> Result<(), ValidationError> {
    let Value::Number(number) = value else {
        return Ok(());
    };

    // Integers beyond i64::MAX only arrive as u64 and are above every minimum.
    let (below, above) = match (number.as_i64(), number.as_u64()) {
        (Some(v), _) => (v < min, max.is_some_and(|max| v > max)),
        (None, Some(_)) => (false, max.is_some()),
        (None, None) => (false, false),
    };

    if below {
        return Err(ValidationError::BelowMinimum {
            field,
            value: number.clone(),
            min,
        });
    }
    if above {
        return Err(ValidationError::AboveMaximum {
            field,
            value: number.clone(),
            max: max.unwrap_or(i64::MAX),
        });
    }
    Ok(())
}

fn check_at_least(field: &'static str, value: &Value, min: i64) -> Result<(), ValidationError> {
    match value {
        Value::Number(number) if number.as_f64().is_some_and(|v| v < min as f64) => {
            Err(ValidationError::BelowMinimum {
                field,
                value: number.clone(),
                min,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!({
            "name": "TestPlayer",
            "level": 5,
            "exp": 100,
            "exp_to_next": 200,
            "gold": 500,
            "inventory": [],
            "schema": 3,
            "base_hp": 10,
            "str": 5,
            "dex": 5,
            "agl": 5,
            "hp": 100,
            "max_hp": 100,
            "attack": 10,
            "defense": 5,
        })
    }

    fn with(key: &str, value: Value) -> Value {
        let mut payload = valid_payload();
        payload[key] = value;
        payload
    }

    #[test]
    fn accepts_well_formed_payload() {
        assert_eq!(validate(&valid_payload()), Ok(()));
    }

    #[test]
    fn rejects_non_object() {
        assert_eq!(
            validate(&json!([1, 2, 3])),
            Err(ValidationError::NotAnObject { found: "array" })
        );
    }

    #[test]
    fn reports_first_missing_required_field() {
        let err = validate(&json!({"name": "TestPlayer"})).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "level" });
        assert!(err.to_string().contains("missing required field"));
    }

    #[test]
    fn schema_tag_is_required() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("schema");
        assert_eq!(
            validate(&payload),
            Err(ValidationError::MissingField { field: "schema" })
        );
    }

    #[test]
    fn rejects_type_mismatch() {
        let err = validate(&with("level", json!("not_a_number"))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::WrongType {
                field: "level",
                expected: FieldKind::Integer,
                found: "string",
            }
        );
    }

    #[test]
    fn floats_and_booleans_are_not_integers() {
        assert!(matches!(
            validate(&with("gold", json!(1.5))),
            Err(ValidationError::WrongType { field: "gold", .. })
        ));
        assert!(matches!(
            validate(&with("gold", json!(true))),
            Err(ValidationError::WrongType { field: "gold", .. })
        ));
    }

    #[test]
    fn rejects_level_above_maximum() {
        let err = validate(&with("level", json!(9999))).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::AboveMaximum {
                field: "level",
                max: 100,
                ..
            }
        ));
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn rejects_negative_gold() {
        assert!(matches!(
            validate(&with("gold", json!(-1))),
            Err(ValidationError::BelowMinimum {
                field: "gold",
                min: 0,
                ..
            })
        ));
    }

    #[test]
    fn huge_unsigned_values_respect_bounded_fields_only() {
        assert_eq!(validate(&with("gold", json!(u64::MAX))), Ok(()));
        assert!(matches!(
            validate(&with("level", json!(u64::MAX))),
            Err(ValidationError::AboveMaximum { field: "level", .. })
        ));
    }

    #[test]
    fn enforces_name_length() {
        assert!(matches!(
            validate(&with("name", json!(""))),
            Err(ValidationError::TooShort { field: "name", .. })
        ));
        assert!(matches!(
            validate(&with("name", json!("x".repeat(51)))),
            Err(ValidationError::TooLong {
                field: "name",
                len: 51,
                max: 50,
            })
        ));
        // Length counts characters, not bytes.
        assert_eq!(validate(&with("name", json!("é".repeat(50)))), Ok(()));
    }

    #[test]
    fn caps_inventory_size() {
        let items: Vec<Value> = (0..1001).map(|i| json!({"id": i})).collect();
        let err = validate(&with("inventory", Value::Array(items))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooManyItems {
                field: "inventory",
                len: 1001,
                max: 1000,
            }
        );
    }

    #[test]
    fn inventory_items_must_be_objects() {
        let err = validate(&with("inventory", json!([{"id": 1}, 7]))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ItemWrongType {
                field: "inventory",
                index: 1,
                expected: FieldKind::Object,
                found: "integer",
            }
        );
    }

    #[test]
    fn equipment_slots_accept_object_or_null() {
        assert_eq!(validate(&with("weapon", Value::Null)), Ok(()));
        assert_eq!(validate(&with("armor", json!({"name": "Leather"}))), Ok(()));
        assert!(matches!(
            validate(&with("tool", json!("pickaxe"))),
            Err(ValidationError::WrongType {
                field: "tool",
                expected: FieldKind::NullableObject,
                ..
            })
        ));
    }

    #[test]
    fn checks_floating_point_lower_bound() {
        assert_eq!(validate(&with("world_anchor_timestamp", json!(12.5))), Ok(()));
        assert!(matches!(
            validate(&with("world_anchor_timestamp", json!(-0.5))),
            Err(ValidationError::BelowMinimum {
                field: "world_anchor_timestamp",
                ..
            })
        ));
    }

    #[test]
    fn unknown_fields_pass_through() {
        let payload = with("pet", json!({"species": "dragon", "level": 9999}));
        assert_eq!(validate(&payload), Ok(()));
    }
}
