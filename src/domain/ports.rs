use crate::domain::model::{Body, Credentials, ResourcePath, ResourceRequest};
use crate::domain::record::Record;
use crate::domain::schema::AttributeSchema;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn org_name(&self) -> &str;
    fn credentials(&self) -> Option<&Credentials>;
    fn timeout_seconds(&self) -> u64;
    fn user_agent(&self) -> &str;
}

/// Anything able to carry a [`ResourceRequest`] to the management API.
#[async_trait]
pub trait ResourceTransport: Send + Sync {
    async fn execute(&self, request: ResourceRequest) -> Result<Body>;
}

/// A REST resource backed by a schema-validated [`Record`].
pub trait Model: Sized + Send {
    /// Key under which list responses wrap their items.
    const WRAPPER_TAG: &'static str;
    const ID_FIELD: &'static str = "id";
    /// Whether the server assigns ids on create.
    const ID_IS_AUTOGENERATED: bool = true;

    fn schema() -> &'static AttributeSchema;

    /// Collection path of this resource within an organization.
    fn collection_path(org_name: &str) -> ResourcePath;

    fn from_record(record: Record) -> Self;

    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    fn id(&self) -> Option<&str> {
        self.record().get_str(Self::ID_FIELD).ok().flatten()
    }
}
