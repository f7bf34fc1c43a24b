use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

use crate::domain::schema::{json_type_name, AttributeSchema, FieldDef, FieldType};
use crate::utils::error::{ApigeeError, Result};

/// Value held by one field of a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(Value),
    Record(Box<Record>),
}

impl FieldValue {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FieldValue::Scalar(v) => Some(v),
            FieldValue::Record(_) => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            FieldValue::Record(r) => Some(r),
            FieldValue::Scalar(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Scalar(Value::Null))
    }

    /// JSON form, expanding nested records.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Scalar(v) => v.clone(),
            FieldValue::Record(r) => Value::Object(r.to_mapping()),
        }
    }
}

/// Keyed attribute bag that only ever holds values its schema accepts.
#[derive(Clone)]
pub struct Record {
    schema: &'static AttributeSchema,
    values: HashMap<&'static str, FieldValue>,
}

impl Record {
    /// Empty record; every field reads as its default.
    pub fn new(schema: &'static AttributeSchema) -> Self {
        Self {
            schema,
            values: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &'static AttributeSchema {
        self.schema
    }

    pub fn kind(&self) -> &'static str {
        self.schema.kind()
    }

    /// Drops every set value.
    pub fn reset(&mut self) {
        self.values.clear();
    }

    pub fn is_set(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    fn field_for_set(&self, field: &str, value: &dyn fmt::Display) -> Result<&'static FieldDef> {
        self.schema.field(field).ok_or_else(|| {
            ApigeeError::validation(
                field,
                value,
                format!("no such field in {} schema", self.schema.kind()),
            )
        })
    }

    /// Validates and stores `value`.
    ///
    /// `null` clears the field. An object given for a nested field builds a
    /// nested record with the same strict rules. On error the record is left
    /// untouched.
    pub fn set(&mut self, field: &str, value: Value) -> Result<()> {
        let def = self.field_for_set(field, &value)?;

        if value.is_null() {
            self.values.remove(def.name());
            return Ok(());
        }

        let stored = match def.field_type() {
            FieldType::Object(schema) => {
                let map = match value {
                    Value::Object(map) => map,
                    other => {
                        return Err(ApigeeError::validation(
                            field,
                            &other,
                            format!("expected object, got {}", json_type_name(&other)),
                        ))
                    }
                };
                let mut nested = Record::new(schema());
                for (key, inner) in map {
                    nested.set(&key, inner)?;
                }
                FieldValue::Record(Box::new(nested))
            }
            _ => {
                let checked = def
                    .check_scalar(&value)
                    .map_err(|reason| ApigeeError::validation(field, &value, reason))?;
                FieldValue::Scalar(checked)
            }
        };

        self.values.insert(def.name(), stored);
        Ok(())
    }

    /// Assigns a nested record to an object field of the matching kind.
    pub fn set_record(&mut self, field: &str, record: Record) -> Result<()> {
        let def = self.field_for_set(field, &record)?;

        match def.field_type().nested_schema() {
            Some(schema) if schema.kind() == record.kind() => {
                self.values
                    .insert(def.name(), FieldValue::Record(Box::new(record)));
                Ok(())
            }
            Some(schema) => Err(ApigeeError::validation(
                field,
                &record,
                format!("expected {} record, got {}", schema.kind(), record.kind()),
            )),
            None => Err(ApigeeError::validation(
                field,
                &record,
                format!("field holds {}, not a record", def.field_type().type_name()),
            )),
        }
    }

    /// Current value, or the schema default when unset.
    pub fn get(&self, field: &str) -> Result<&FieldValue> {
        let def = self
            .schema
            .field(field)
            .ok_or_else(|| ApigeeError::UnknownFieldError {
                kind: self.schema.kind().to_string(),
                field: field.to_string(),
            })?;
        Ok(self.values.get(def.name()).unwrap_or(def.default_value()))
    }

    pub fn get_str(&self, field: &str) -> Result<Option<&str>> {
        Ok(self.get(field)?.as_value().and_then(Value::as_str))
    }

    pub fn get_f64(&self, field: &str) -> Result<Option<f64>> {
        Ok(self.get(field)?.as_value().and_then(Value::as_f64))
    }

    pub fn get_i64(&self, field: &str) -> Result<Option<i64>> {
        Ok(self.get(field)?.as_value().and_then(Value::as_i64))
    }

    pub fn get_bool(&self, field: &str) -> Result<Option<bool>> {
        Ok(self.get(field)?.as_value().and_then(Value::as_bool))
    }

    pub fn get_record(&self, field: &str) -> Result<Option<&Record>> {
        Ok(self.get(field)?.as_record())
    }

    /// Set, serializable fields in declaration order, nested records expanded.
    pub fn to_mapping(&self) -> Map<String, Value> {
        self.schema
            .serializable_fields()
            .filter_map(|def| {
                self.values
                    .get(def.name())
                    .map(|v| (def.name().to_string(), v.to_json()))
            })
            .collect()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("kind", &self.kind())
            .field("values", &self.values)
            .finish()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.to_mapping()))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_mapping().serialize(serializer)
    }
}
