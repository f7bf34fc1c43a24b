//! Attribute schemas: the declared fields of each model kind.
//!
//! A schema lists fields in declaration order with their semantic type, an
//! optional closed set of allowed values and a default. Schemas are built
//! once per model kind (usually behind a `LazyLock`) and never change
//! afterwards.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::domain::record::FieldValue;

/// Date layouts accepted for [`FieldType::Date`] fields.
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Semantic type of a field.
#[derive(Clone, Copy)]
pub enum FieldType {
    String,
    /// Any JSON number.
    Number,
    /// JSON number without a fractional part.
    Integer,
    Boolean,
    /// String in `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339 form.
    Date,
    /// Nested record of the kind described by the referenced schema.
    Object(fn() -> &'static AttributeSchema),
}

impl FieldType {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Object(_) => "object",
        }
    }

    /// Schema of the nested record, for object fields.
    pub fn nested_schema(&self) -> Option<&'static AttributeSchema> {
        match self {
            FieldType::Object(schema) => Some(schema()),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Object(schema) => write!(f, "Object({})", schema().kind()),
            other => f.write_str(other.type_name()),
        }
    }
}

/// How input is normalized before it is compared against allowed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    #[default]
    Exact,
    Uppercase,
}

/// Result of a schema lookup for a field's value constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Unconstrained,
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    name: &'static str,
    field_type: FieldType,
    allowed_values: Option<&'static [&'static str]>,
    normalization: Normalization,
    default: FieldValue,
    serializable: bool,
}

impl FieldDef {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn constraint(&self) -> Constraint {
        match self.allowed_values {
            Some(values) => Constraint::OneOf(values),
            None => Constraint::Unconstrained,
        }
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    pub fn default_value(&self) -> &FieldValue {
        &self.default
    }

    /// Whether the field appears in a record's mapping.
    pub fn is_serializable(&self) -> bool {
        self.serializable
    }

    pub fn is_nested(&self) -> bool {
        matches!(self.field_type, FieldType::Object(_))
    }

    /// Checks a scalar against this field and returns the value to store.
    ///
    /// The error is a human-readable reason; callers wrap it with the field
    /// name and offending value.
    pub fn check_scalar(&self, value: &Value) -> std::result::Result<Value, String> {
        match self.field_type {
            FieldType::String => expect_type(value, value.is_string(), "string")?,
            FieldType::Number => expect_type(value, value.is_number(), "number")?,
            FieldType::Integer => {
                expect_type(value, value.is_i64() || value.is_u64(), "integer")?
            }
            FieldType::Boolean => expect_type(value, value.is_boolean(), "boolean")?,
            FieldType::Date => {
                let text = value
                    .as_str()
                    .ok_or_else(|| format!("expected date string, got {}", json_type_name(value)))?;
                if !is_valid_date(text) {
                    return Err(format!("'{}' is not a recognised date", text));
                }
            }
            FieldType::Object(_) => {
                return Err(format!(
                    "expected object, got {}",
                    json_type_name(value)
                ))
            }
        }

        let value = match (self.normalization, value) {
            (Normalization::Uppercase, Value::String(s)) => Value::String(s.to_uppercase()),
            _ => value.clone(),
        };

        if let (Some(allowed), Some(text)) = (self.allowed_values, value.as_str()) {
            if !allowed.contains(&text) {
                return Err(format!("allowed values are [{}]", allowed.join("|")));
            }
        }

        Ok(value)
    }
}

fn expect_type(value: &Value, ok: bool, expected: &str) -> std::result::Result<(), String> {
    if ok {
        Ok(())
    } else {
        Err(format!("expected {}, got {}", expected, json_type_name(value)))
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_valid_date(text: &str) -> bool {
    NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT).is_ok()
        || NaiveDate::parse_from_str(text, DATE_FORMAT).is_ok()
        || DateTime::parse_from_rfc3339(text).is_ok()
}

/// Declared fields of one model kind.
#[derive(Debug)]
pub struct AttributeSchema {
    kind: &'static str,
    fields: Vec<FieldDef>,
    index: HashMap<&'static str, usize>,
}

impl AttributeSchema {
    pub fn builder(kind: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            kind,
            fields: Vec::new(),
        }
    }

    /// Model kind name, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter()
    }

    /// Fields emitted by [`crate::domain::record::Record::to_mapping`].
    pub fn serializable_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.serializable)
    }

    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.field(name).map(FieldDef::field_type)
    }

    pub fn constraint(&self, name: &str) -> Option<Constraint> {
        self.field(name).map(FieldDef::constraint)
    }
}

pub struct SchemaBuilder {
    kind: &'static str,
    fields: Vec<FieldDef>,
}

impl SchemaBuilder {
    /// Declares a field.
    ///
    /// # Panics
    ///
    /// Panics when the name is declared twice or when the default does not
    /// satisfy the field's own type and allowed values. Both are mistakes
    /// in a static schema definition.
    pub fn define(
        mut self,
        name: &'static str,
        field_type: FieldType,
        allowed_values: Option<&'static [&'static str]>,
        default: Option<Value>,
    ) -> Self {
        assert!(
            self.fields.iter().all(|f| f.name != name),
            "field '{}' declared twice in {} schema",
            name,
            self.kind
        );

        let mut def = FieldDef {
            name,
            field_type,
            allowed_values,
            normalization: Normalization::Exact,
            default: FieldValue::Scalar(Value::Null),
            serializable: true,
        };

        if let Some(default) = default.filter(|d| !d.is_null()) {
            let checked = def.check_scalar(&default);
            assert!(
                checked.is_ok(),
                "invalid default for {}.{}: {:?}",
                self.kind,
                name,
                checked
            );
            def.default = FieldValue::Scalar(default);
        }

        self.fields.push(def);
        self
    }

    pub fn field(self, name: &'static str, field_type: FieldType) -> Self {
        self.define(name, field_type, None, None)
    }

    pub fn field_with_default(
        self,
        name: &'static str,
        field_type: FieldType,
        default: Value,
    ) -> Self {
        self.define(name, field_type, None, Some(default))
    }

    /// String field restricted to `allowed`, compared case-sensitively.
    pub fn enumerated(self, name: &'static str, allowed: &'static [&'static str]) -> Self {
        self.define(name, FieldType::String, Some(allowed), None)
    }

    /// String field restricted to `allowed`; input is uppercased first and
    /// stored uppercased.
    pub fn enumerated_uppercase(
        mut self,
        name: &'static str,
        allowed: &'static [&'static str],
    ) -> Self {
        self = self.define(name, FieldType::String, Some(allowed), None);
        if let Some(last) = self.fields.last_mut() {
            last.normalization = Normalization::Uppercase;
        }
        self
    }

    pub fn nested(self, name: &'static str, schema: fn() -> &'static AttributeSchema) -> Self {
        self.define(name, FieldType::Object(schema), None, None)
    }

    /// Marks an already declared field as bookkeeping: it can be read and
    /// set but is left out of the record's mapping.
    pub fn bookkeeping(mut self, name: &'static str) -> Self {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(def) => def.serializable = false,
            None => panic!("bookkeeping field '{}' not declared in {} schema", name, self.kind),
        }
        self
    }

    pub fn build(self) -> AttributeSchema {
        let index = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name, i))
            .collect();
        AttributeSchema {
            kind: self.kind,
            fields: self.fields,
            index,
        }
    }
}
