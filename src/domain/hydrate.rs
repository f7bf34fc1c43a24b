//! Raw-data hydration: filling records from parsed JSON.
//!
//! Hydration is permissive where [`Record::set`] is strict: keys the schema
//! does not declare are skipped and reported instead of failing, so a client
//! keeps working when the server starts returning new fields. Values for
//! declared fields still go through full validation.

use serde_json::{Map, Value};

use crate::domain::record::Record;
use crate::domain::schema::{json_type_name, AttributeSchema};
use crate::utils::error::{ApigeeError, Result};

/// Keys ignored during a hydration, as dotted paths from the root record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrationReport {
    pub skipped: Vec<String>,
}

impl HydrationReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Populates `record` from `raw`.
///
/// With `reset`, the record starts again from schema defaults; otherwise
/// fields absent from `raw` keep their values. The record is only replaced
/// once every key has been applied, so a validation failure leaves it as it
/// was.
pub fn hydrate(record: &mut Record, raw: &Map<String, Value>, reset: bool) -> Result<HydrationReport> {
    let mut staged = if reset {
        Record::new(record.schema())
    } else {
        record.clone()
    };

    let mut report = HydrationReport::default();
    apply(&mut staged, raw, "", &mut report)?;

    if !report.is_clean() {
        tracing::debug!(
            kind = record.kind(),
            skipped = report.skipped.len(),
            "Hydration skipped unknown keys"
        );
    }

    *record = staged;
    Ok(report)
}

/// Like [`hydrate`] but accepts any JSON value, which must be an object.
pub fn hydrate_value(record: &mut Record, raw: &Value, reset: bool) -> Result<HydrationReport> {
    match raw {
        Value::Object(map) => hydrate(record, map, reset),
        other => Err(ApigeeError::validation(
            record.kind(),
            other,
            format!("expected object, got {}", json_type_name(other)),
        )),
    }
}

/// Builds a fresh record of the given kind from `raw`.
pub fn from_raw(
    schema: &'static AttributeSchema,
    raw: &Map<String, Value>,
) -> Result<(Record, HydrationReport)> {
    let mut record = Record::new(schema);
    let report = hydrate(&mut record, raw, true)?;
    Ok((record, report))
}

fn apply(
    record: &mut Record,
    raw: &Map<String, Value>,
    prefix: &str,
    report: &mut HydrationReport,
) -> Result<()> {
    let schema = record.schema();

    for (key, value) in raw {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        let Some(def) = schema.field(key) else {
            tracing::info!(
                kind = schema.kind(),
                field = %path,
                "No matching field was found for property; skipping"
            );
            report.skipped.push(path);
            continue;
        };

        match (def.field_type().nested_schema(), value) {
            (Some(nested_schema), Value::Object(inner)) => {
                let mut nested = Record::new(nested_schema);
                apply(&mut nested, inner, &path, report)?;
                record.set_record(key, nested)?;
            }
            _ => record.set(key, value.clone())?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::FieldType;
    use serde_json::json;
    use std::sync::LazyLock;

    static ORG: LazyLock<AttributeSchema> = LazyLock::new(|| {
        AttributeSchema::builder("Org")
            .field("id", FieldType::String)
            .field("currency", FieldType::String)
            .build()
    });

    static ITEM: LazyLock<AttributeSchema> = LazyLock::new(|| {
        AttributeSchema::builder("Item")
            .field("name", FieldType::String)
            .enumerated_uppercase("durationType", &["DAY", "WEEK"])
            .field_with_default("duration", FieldType::Integer, json!(0))
            .nested("organization", org)
            .build()
    });

    fn org() -> &'static AttributeSchema {
        &ORG
    }

    fn raw(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_hydrate_nested_and_unknown_keys() {
        let input = raw(json!({
            "name": "x",
            "organization": {"id": "o1", "motto": "hi"},
            "mystery": 1
        }));

        let (record, report) = from_raw(&ITEM, &input).unwrap();

        assert_eq!(record.get_str("name").unwrap(), Some("x"));
        let nested = record.get_record("organization").unwrap().unwrap();
        assert_eq!(nested.get_str("id").unwrap(), Some("o1"));
        assert!(!record.to_mapping().contains_key("mystery"));
        assert_eq!(report.skipped, vec!["organization.motto", "mystery"]);
    }

    #[test]
    fn test_round_trip_restricted_to_known_fields() {
        let input = raw(json!({
            "name": "gold",
            "durationType": "WEEK",
            "duration": 2,
            "organization": {"id": "o1", "currency": "USD"},
            "extra": {"deep": true}
        }));

        let (record, _) = from_raw(&ITEM, &input).unwrap();

        let mut expected = input.clone();
        expected.remove("extra");
        assert_eq!(record.to_mapping(), expected);
    }

    #[test]
    fn test_reset_reinitializes_before_applying() {
        let mut record = Record::new(&ITEM);
        record.set("name", json!("old")).unwrap();
        record.set("duration", json!(5)).unwrap();

        hydrate(&mut record, &raw(json!({"durationType": "day"})), false).unwrap();
        assert_eq!(record.get_str("name").unwrap(), Some("old"));
        assert_eq!(record.get_str("durationType").unwrap(), Some("DAY"));

        hydrate(&mut record, &raw(json!({"name": "new"})), true).unwrap();
        assert_eq!(record.get_str("name").unwrap(), Some("new"));
        assert_eq!(record.get_i64("duration").unwrap(), Some(0));
        assert!(!record.is_set("durationType"));
    }

    #[test]
    fn test_invalid_known_value_fails_and_leaves_record() {
        let mut record = Record::new(&ITEM);
        record.set("name", json!("keep")).unwrap();

        let result = hydrate(
            &mut record,
            &raw(json!({"name": "changed", "durationType": "fortnight"})),
            false,
        );

        assert!(matches!(result, Err(ApigeeError::ValidationError { .. })));
        assert_eq!(record.get_str("name").unwrap(), Some("keep"));
    }

    #[test]
    fn test_unknown_keys_do_not_touch_known_fields() {
        let mut record = Record::new(&ITEM);
        record.set("name", json!("steady")).unwrap();

        let report = hydrate(&mut record, &raw(json!({"Name": "shadow", "name2": 3})), false).unwrap();

        assert_eq!(report.skipped.len(), 2);
        assert_eq!(record.get_str("name").unwrap(), Some("steady"));
    }

    #[test]
    fn test_hydrate_value_requires_object() {
        let mut record = Record::new(&ITEM);
        assert!(hydrate_value(&mut record, &json!([1, 2]), false).is_err());
        assert!(hydrate_value(&mut record, &json!({"name": "ok"}), false).is_ok());
    }

    #[test]
    fn test_null_nested_clears_field() {
        let mut record = Record::new(&ITEM);
        record.set("organization", json!({"id": "o1"})).unwrap();

        hydrate(&mut record, &raw(json!({"organization": null})), false).unwrap();
        assert!(record.get_record("organization").unwrap().is_none());
    }
}
