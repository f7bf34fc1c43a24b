//! Monetization limits: quotas on transactions or spend, per developer,
//! package, product or application.

use crate::app::resources::organization::{self, Organization};
use crate::core::repository::ModelRepository;
use crate::domain::model::{RequestOptions, ResourcePath};
use crate::domain::ports::{Model, ResourceTransport};
use crate::domain::record::Record;
use crate::domain::schema::{AttributeSchema, FieldType};
use crate::utils::error::Result;
use serde_json::{json, Value};
use std::sync::LazyLock;

pub const QUOTA_TYPES: &[&str] = &["Transactions", "CreditLimit", "SpendLimit", "FeeExposure", "Balance"];
pub const QUOTA_PERIOD_TYPES: &[&str] = &["CALENDAR", "USAGE_START", "ROLLING"];
pub const DURATION_TYPES: &[&str] = &["DAY", "WEEK", "MONTH", "QUARTER", "YEAR"];

static LIMIT_SCHEMA: LazyLock<AttributeSchema> = LazyLock::new(|| {
    AttributeSchema::builder("Limit")
        .field("id", FieldType::String)
        .field("name", FieldType::String)
        .nested("organization", organization::schema)
        .field("subOrganization", FieldType::String)
        .field("startDate", FieldType::Date)
        .field("limitKey", FieldType::String)
        .field("developerCategory", FieldType::String)
        .field("developer", FieldType::String)
        .field("monetizationPackage", FieldType::String)
        .field("product", FieldType::String)
        .field("application", FieldType::String)
        .field("userId", FieldType::String)
        .field("developerBillingType", FieldType::String)
        .field_with_default("quotaLimit", FieldType::Number, json!(0))
        .field("currency", FieldType::String)
        .enumerated("quotaType", QUOTA_TYPES)
        .enumerated("quotaPeriodType", QUOTA_PERIOD_TYPES)
        .field_with_default("duration", FieldType::Integer, json!(0))
        .enumerated_uppercase("durationType", DURATION_TYPES)
        .field_with_default("published", FieldType::Boolean, json!(false))
        .field_with_default("haltExecution", FieldType::Boolean, json!(false))
        .build()
});

pub fn schema() -> &'static AttributeSchema {
    &LIMIT_SCHEMA
}

#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    record: Record,
}

impl Default for Limit {
    fn default() -> Self {
        Self::new()
    }
}

impl Limit {
    pub fn new() -> Self {
        Self {
            record: Record::new(schema()),
        }
    }

    fn text(&self, field: &str) -> Option<&str> {
        self.record.get_str(field).ok().flatten()
    }

    fn flag(&self, field: &str) -> bool {
        self.record.get_bool(field).ok().flatten().unwrap_or(false)
    }

    fn put(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        self.record.set(field, value.into())
    }

    pub fn name(&self) -> Option<&str> {
        self.text("name")
    }

    /// Owning organization, when the server sent one.
    pub fn organization(&self) -> Option<Organization> {
        self.record
            .get_record("organization")
            .ok()
            .flatten()
            .map(|r| Organization::from_record(r.clone()))
    }

    pub fn sub_organization(&self) -> Option<&str> {
        self.text("subOrganization")
    }

    pub fn start_date(&self) -> Option<&str> {
        self.text("startDate")
    }

    pub fn limit_key(&self) -> Option<&str> {
        self.text("limitKey")
    }

    /// Not honoured by the server yet.
    pub fn developer_category(&self) -> Option<&str> {
        self.text("developerCategory")
    }

    pub fn developer(&self) -> Option<&str> {
        self.text("developer")
    }

    pub fn monetization_package(&self) -> Option<&str> {
        self.text("monetizationPackage")
    }

    pub fn product(&self) -> Option<&str> {
        self.text("product")
    }

    pub fn application(&self) -> Option<&str> {
        self.text("application")
    }

    /// Product custom attribute identifying the user; unique across an org.
    pub fn user_id(&self) -> Option<&str> {
        self.text("userId")
    }

    pub fn developer_billing_type(&self) -> Option<&str> {
        self.text("developerBillingType")
    }

    /// Amount in `currency`, or a transaction count.
    pub fn quota_limit(&self) -> f64 {
        self.record.get_f64("quotaLimit").ok().flatten().unwrap_or(0.0)
    }

    pub fn currency(&self) -> Option<&str> {
        self.text("currency")
    }

    pub fn quota_type(&self) -> Option<&str> {
        self.text("quotaType")
    }

    pub fn quota_period_type(&self) -> Option<&str> {
        self.text("quotaPeriodType")
    }

    pub fn duration(&self) -> i64 {
        self.record.get_i64("duration").ok().flatten().unwrap_or(0)
    }

    pub fn duration_type(&self) -> Option<&str> {
        self.text("durationType")
    }

    pub fn is_published(&self) -> bool {
        self.flag("published")
    }

    pub fn halt_execution(&self) -> bool {
        self.flag("haltExecution")
    }

    pub fn set_id(&mut self, id: &str) -> Result<()> {
        self.put("id", id)
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.put("name", name)
    }

    pub fn set_organization(&mut self, organization: Organization) -> Result<()> {
        self.record
            .set_record("organization", organization.record().clone())
    }

    pub fn set_sub_organization(&mut self, sub_organization: &str) -> Result<()> {
        self.put("subOrganization", sub_organization)
    }

    /// `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339.
    pub fn set_start_date(&mut self, start_date: &str) -> Result<()> {
        self.put("startDate", start_date)
    }

    pub fn set_limit_key(&mut self, limit_key: &str) -> Result<()> {
        self.put("limitKey", limit_key)
    }

    pub fn set_developer_category(&mut self, category: &str) -> Result<()> {
        self.put("developerCategory", category)
    }

    pub fn set_developer(&mut self, developer: &str) -> Result<()> {
        self.put("developer", developer)
    }

    pub fn set_monetization_package(&mut self, package: &str) -> Result<()> {
        self.put("monetizationPackage", package)
    }

    pub fn set_product(&mut self, product: &str) -> Result<()> {
        self.put("product", product)
    }

    pub fn set_application(&mut self, application: &str) -> Result<()> {
        self.put("application", application)
    }

    pub fn set_user_id(&mut self, user_id: &str) -> Result<()> {
        self.put("userId", user_id)
    }

    pub fn set_developer_billing_type(&mut self, billing_type: &str) -> Result<()> {
        self.put("developerBillingType", billing_type)
    }

    pub fn set_quota_limit(&mut self, quota_limit: f64) -> Result<()> {
        self.put("quotaLimit", quota_limit)
    }

    pub fn set_currency(&mut self, currency: &str) -> Result<()> {
        self.put("currency", currency)
    }

    /// Allowed values: [Transactions|CreditLimit|SpendLimit|FeeExposure|Balance]
    pub fn set_quota_type(&mut self, quota_type: &str) -> Result<()> {
        self.put("quotaType", quota_type)
    }

    /// Allowed values: [CALENDAR|USAGE_START|ROLLING]
    pub fn set_quota_period_type(&mut self, period_type: &str) -> Result<()> {
        self.put("quotaPeriodType", period_type)
    }

    pub fn set_duration(&mut self, duration: i64) -> Result<()> {
        self.put("duration", duration)
    }

    /// Allowed values: [DAY|WEEK|MONTH|QUARTER|YEAR], any case.
    pub fn set_duration_type(&mut self, duration_type: &str) -> Result<()> {
        self.put("durationType", duration_type)
    }

    pub fn set_published(&mut self, published: bool) -> Result<()> {
        self.put("published", published)
    }

    pub fn set_halt_execution(&mut self, halt: bool) -> Result<()> {
        self.put("haltExecution", halt)
    }
}

impl Model for Limit {
    const WRAPPER_TAG: &'static str = "limit";
    const ID_IS_AUTOGENERATED: bool = false;

    fn schema() -> &'static AttributeSchema {
        schema()
    }

    fn collection_path(org_name: &str) -> ResourcePath {
        ResourcePath::parse("mint/organizations")
            .segment(org_name)
            .segment("limits")
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

impl<T: ResourceTransport> ModelRepository<Limit, T> {
    /// Limits applying to one developer, optionally narrowed to a package
    /// and to limits that do (or do not) halt execution.
    pub async fn developer_limits(
        &self,
        developer_id: &str,
        package_id: Option<&str>,
        halt: Option<bool>,
    ) -> Result<Vec<Limit>> {
        let mut options = RequestOptions::default().with_query("dev", developer_id);
        if let Some(package_id) = package_id {
            options = options.with_query("pkg", package_id);
        }
        if let Some(halt) = halt {
            options = options.with_query("halt", if halt { "true" } else { "false" });
        }

        self.list_with(options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repository::tests::MockTransport;
    use crate::domain::model::Body;
    use crate::utils::error::ApigeeError;

    #[test]
    fn test_defaults_match_fresh_limit() {
        let limit = Limit::new();

        assert_eq!(limit.quota_limit(), 0.0);
        assert_eq!(limit.duration(), 0);
        assert!(!limit.is_published());
        assert!(!limit.halt_execution());
        assert!(limit.quota_type().is_none());
        assert!(limit.organization().is_none());
        assert!(limit.record().to_mapping().is_empty());
    }

    #[test]
    fn test_every_quota_type_is_accepted() {
        let mut limit = Limit::new();
        for quota_type in QUOTA_TYPES {
            limit.set_quota_type(quota_type).unwrap();
            assert_eq!(limit.quota_type(), Some(*quota_type));
        }
        assert!(matches!(
            limit.set_quota_type("transactions"),
            Err(ApigeeError::ValidationError { .. })
        ));
        assert_eq!(limit.quota_type(), Some("Balance"));
    }

    #[test]
    fn test_quota_period_and_duration_types() {
        let mut limit = Limit::new();

        limit.set_quota_period_type("ROLLING").unwrap();
        assert_eq!(limit.quota_period_type(), Some("ROLLING"));
        assert!(limit.set_quota_period_type("bogus").is_err());
        assert_eq!(limit.quota_period_type(), Some("ROLLING"));

        limit.set_duration_type("day").unwrap();
        assert_eq!(limit.duration_type(), Some("DAY"));
        for unit in DURATION_TYPES {
            limit.set_duration_type(&unit.to_lowercase()).unwrap();
            assert_eq!(limit.duration_type(), Some(*unit));
        }
    }

    #[test]
    fn test_start_date_must_be_a_date() {
        let mut limit = Limit::new();
        limit.set_start_date("2014-03-01 00:00:00").unwrap();
        assert!(limit.set_start_date("March first").is_err());
        assert_eq!(limit.start_date(), Some("2014-03-01 00:00:00"));
    }

    #[test]
    fn test_organization_is_owned_copy() {
        let mut org = Organization::new();
        org.set_id("o1").unwrap();

        let mut limit = Limit::new();
        limit.set_organization(org.clone()).unwrap();
        org.set_name("changed later").unwrap();

        let nested = limit.organization().unwrap();
        assert_eq!(nested.id(), Some("o1"));
        assert!(nested.name().is_none());
    }

    #[tokio::test]
    async fn test_developer_limits_query_and_hydration() {
        let transport = MockTransport::replying(vec![Ok(Body::Json(json!({
            "limit": [
                {
                    "id": "l1",
                    "name": "Monthly spend",
                    "organization": {"id": "acme", "name": "Acme"},
                    "quotaType": "SpendLimit",
                    "quotaPeriodType": "CALENDAR",
                    "durationType": "month",
                    "duration": 1,
                    "quotaLimit": 100.5,
                    "haltExecution": true,
                    "createdBy": "someone"
                }
            ],
            "totalRecords": 1
        })))]);
        let repo: ModelRepository<Limit, _> = ModelRepository::new(transport.clone(), "acme");

        let limits = repo.developer_limits("dev-1", Some("pkg-1"), Some(false)).await.unwrap();

        assert_eq!(limits.len(), 1);
        let limit = &limits[0];
        assert_eq!(limit.id(), Some("l1"));
        assert_eq!(limit.duration_type(), Some("MONTH"));
        assert_eq!(limit.quota_limit(), 100.5);
        assert!(limit.halt_execution());
        assert_eq!(limit.organization().unwrap().name(), Some("Acme"));
        assert!(!limit.record().to_mapping().contains_key("createdBy"));

        let request = &transport.requests()[0];
        assert_eq!(
            request.options.query,
            vec![
                ("dev".to_string(), "dev-1".to_string()),
                ("pkg".to_string(), "pkg-1".to_string()),
                ("halt".to_string(), "false".to_string()),
            ]
        );
        assert_eq!(
            request.options.base_path,
            Some(ResourcePath::parse("mint/organizations/acme/limits"))
        );
    }

    #[tokio::test]
    async fn test_developer_limits_without_optional_filters() {
        let transport = MockTransport::replying(vec![Ok(Body::Json(json!({"limit": []})))]);
        let repo: ModelRepository<Limit, _> = ModelRepository::new(transport.clone(), "acme");

        let limits = repo.developer_limits("dev-2", None, None).await.unwrap();

        assert!(limits.is_empty());
        assert_eq!(
            transport.requests()[0].options.query,
            vec![("dev".to_string(), "dev-2".to_string())]
        );
    }
}
