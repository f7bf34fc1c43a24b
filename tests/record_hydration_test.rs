use anyhow::Result;
use apigee_client::domain::hydrate::{from_raw, hydrate};
use apigee_client::domain::record::Record;
use apigee_client::domain::schema::AttributeSchema;
use apigee_client::app::resources::{limit, organization};
use apigee_client::ApigeeError;
use serde_json::{json, Map, Value};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("test input must be an object"),
    }
}

fn limit_schema() -> &'static AttributeSchema {
    limit::schema()
}

#[test]
fn test_unknown_keys_are_skipped_and_nested_objects_hydrated() -> Result<()> {
    let raw = object(json!({"name": "x", "organization": {"id": "o1"}, "mystery": 1}));

    let (record, report) = from_raw(limit_schema(), &raw)?;

    assert_eq!(report.skipped, vec!["mystery".to_string()]);
    assert_eq!(record.get_str("name")?, Some("x"));
    let org = record.get_record("organization")?.expect("organization is set");
    assert_eq!(org.kind(), "Organization");
    assert_eq!(org.get_str("id")?, Some("o1"));
    assert_eq!(
        Value::Object(record.to_mapping()),
        json!({"name": "x", "organization": {"id": "o1"}})
    );
    Ok(())
}

#[test]
fn test_nested_unknown_keys_use_dotted_paths() -> Result<()> {
    let raw = object(json!({"organization": {"id": "o1", "addresses": []}}));

    let (_, report) = from_raw(limit_schema(), &raw)?;

    assert_eq!(report.skipped, vec!["organization.addresses".to_string()]);
    Ok(())
}

#[test]
fn test_mapping_round_trips_through_hydration() -> Result<()> {
    let mut built = Record::new(limit_schema());
    built.set("name", json!("Monthly"))?;
    built.set("quotaType", json!("FeeExposure"))?;
    built.set("durationType", json!("quarter"))?;
    built.set("startDate", json!("2015-04-01"))?;
    built.set("organization", json!({"id": "acme", "taxModel": "DISCLOSED"}))?;

    let (copy, report) = from_raw(limit_schema(), &built.to_mapping())?;

    assert!(report.is_clean());
    assert_eq!(copy, built);
    assert_eq!(copy.get_str("durationType")?, Some("QUARTER"));
    Ok(())
}

#[test]
fn test_failed_hydration_leaves_record_untouched() -> Result<()> {
    let mut record = Record::new(limit_schema());
    record.set("name", json!("keep me"))?;
    let before = record.clone();

    let raw = object(json!({"name": "changed", "quotaPeriodType": "HOURLY"}));
    let err = hydrate(&mut record, &raw, false).unwrap_err();

    assert!(matches!(err, ApigeeError::ValidationError { .. }));
    assert_eq!(record, before);
    Ok(())
}

#[test]
fn test_hydrate_without_reset_merges() -> Result<()> {
    let mut record = Record::new(organization::schema());
    record.set("name", json!("Acme"))?;

    hydrate(&mut record, &object(json!({"currency": "EUR"})), false)?;
    assert_eq!(record.get_str("name")?, Some("Acme"));
    assert_eq!(record.get_str("currency")?, Some("EUR"));

    hydrate(&mut record, &object(json!({"currency": "GBP"})), true)?;
    assert_eq!(record.get_str("name")?, None);
    assert_eq!(record.get_bool("hasSelfBilling")?, Some(false));
    Ok(())
}

#[test]
fn test_strict_set_and_get_errors() {
    let mut record = Record::new(limit_schema());

    assert!(matches!(
        record.set("mystery", json!(1)),
        Err(ApigeeError::ValidationError { .. })
    ));
    assert!(matches!(
        record.get("mystery"),
        Err(ApigeeError::UnknownFieldError { .. })
    ));
    assert!(matches!(
        record.set("quotaLimit", json!("lots")),
        Err(ApigeeError::ValidationError { .. })
    ));
    assert!(record.to_mapping().is_empty());
}
