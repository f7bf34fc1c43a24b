pub mod client;
pub mod repository;

pub use crate::domain::model::{Body, ContentType, RequestOptions, ResourcePath};
pub use crate::domain::ports::{ConfigProvider, Model, ResourceTransport};
pub use crate::utils::error::Result;
pub use client::{resolve_url, RestResourceClient};
pub use repository::{ModelRepository, SaveMode};
