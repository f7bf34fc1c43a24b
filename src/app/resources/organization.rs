//! Monetization organization profile.

use crate::domain::model::ResourcePath;
use crate::domain::ports::Model;
use crate::domain::record::Record;
use crate::domain::schema::{AttributeSchema, FieldType};
use crate::utils::error::Result;
use serde_json::{json, Value};
use std::sync::LazyLock;

pub const TAX_MODELS: &[&str] = &["UNDISCLOSED", "DISCLOSED", "HYBRID"];
pub const BILLING_TYPES: &[&str] = &["PREPAID", "POSTPAID", "BOTH"];
pub const BILLING_CYCLES: &[&str] = &["PRORATED", "CALENDAR_MONTH"];

static ORGANIZATION_SCHEMA: LazyLock<AttributeSchema> = LazyLock::new(|| {
    AttributeSchema::builder("Organization")
        .field("id", FieldType::String)
        .field("name", FieldType::String)
        .field("description", FieldType::String)
        .field("currency", FieldType::String)
        .field("country", FieldType::String)
        .field("timezone", FieldType::String)
        .field("status", FieldType::String)
        .enumerated("billingCycle", BILLING_CYCLES)
        .enumerated("taxModel", TAX_MODELS)
        .enumerated("supportedBillingType", BILLING_TYPES)
        .field_with_default("hasSelfBilling", FieldType::Boolean, json!(false))
        .field("regNo", FieldType::String)
        .field("taxRegNo", FieldType::String)
        .field("logoUrl", FieldType::String)
        .build()
});

pub fn schema() -> &'static AttributeSchema {
    &ORGANIZATION_SCHEMA
}

#[derive(Debug, Clone, PartialEq)]
pub struct Organization {
    record: Record,
}

impl Default for Organization {
    fn default() -> Self {
        Self::new()
    }
}

impl Organization {
    pub fn new() -> Self {
        Self {
            record: Record::new(schema()),
        }
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.record.get_str(field).ok().flatten()
    }

    fn put(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        self.record.set(field, value.into())
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.text("description")
    }

    pub fn currency(&self) -> Option<&str> {
        self.text("currency")
    }

    pub fn country(&self) -> Option<&str> {
        self.text("country")
    }

    pub fn timezone(&self) -> Option<&str> {
        self.text("timezone")
    }

    pub fn status(&self) -> Option<&str> {
        self.text("status")
    }

    pub fn billing_cycle(&self) -> Option<&str> {
        self.text("billingCycle")
    }

    pub fn tax_model(&self) -> Option<&str> {
        self.text("taxModel")
    }

    pub fn supported_billing_type(&self) -> Option<&str> {
        self.text("supportedBillingType")
    }

    pub fn reg_no(&self) -> Option<&str> {
        self.text("regNo")
    }

    pub fn tax_reg_no(&self) -> Option<&str> {
        self.text("taxRegNo")
    }

    pub fn logo_url(&self) -> Option<&str> {
        self.text("logoUrl")
    }

    pub fn has_self_billing(&self) -> bool {
        self.record.get_bool("hasSelfBilling").ok().flatten().unwrap_or(false)
    }

    pub fn set_id(&mut self, id: &str) -> Result<()> {
        self.put("id", id)
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.put("name", name)
    }

    pub fn set_description(&mut self, description: &str) -> Result<()> {
        self.put("description", description)
    }

    pub fn set_currency(&mut self, currency: &str) -> Result<()> {
        self.put("currency", currency)
    }

    pub fn set_country(&mut self, country: &str) -> Result<()> {
        self.put("country", country)
    }

    pub fn set_timezone(&mut self, timezone: &str) -> Result<()> {
        self.put("timezone", timezone)
    }

    pub fn set_status(&mut self, status: &str) -> Result<()> {
        self.put("status", status)
    }

    /// Allowed values: [PRORATED|CALENDAR_MONTH]
    pub fn set_billing_cycle(&mut self, cycle: &str) -> Result<()> {
        self.put("billingCycle", cycle)
    }

    /// Allowed values: [UNDISCLOSED|DISCLOSED|HYBRID]
    pub fn set_tax_model(&mut self, model: &str) -> Result<()> {
        self.put("taxModel", model)
    }

    /// Allowed values: [PREPAID|POSTPAID|BOTH]
    pub fn set_supported_billing_type(&mut self, billing_type: &str) -> Result<()> {
        self.put("supportedBillingType", billing_type)
    }

    pub fn set_has_self_billing(&mut self, enabled: bool) -> Result<()> {
        self.put("hasSelfBilling", enabled)
    }

    pub fn set_reg_no(&mut self, reg_no: &str) -> Result<()> {
        self.put("regNo", reg_no)
    }

    pub fn set_tax_reg_no(&mut self, tax_reg_no: &str) -> Result<()> {
        self.put("taxRegNo", tax_reg_no)
    }

    pub fn set_logo_url(&mut self, logo_url: &str) -> Result<()> {
        self.put("logoUrl", logo_url)
    }
}

impl Model for Organization {
    const WRAPPER_TAG: &'static str = "organization";
    const ID_IS_AUTOGENERATED: bool = false;

    fn schema() -> &'static AttributeSchema {
        schema()
    }

    /// Organizations are addressed by id directly under this path.
    fn collection_path(_org_name: &str) -> ResourcePath {
        ResourcePath::parse("mint/organizations")
    }

    fn from_record(record: Record) -> Self {
        Self { record }
    }

    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }
}
