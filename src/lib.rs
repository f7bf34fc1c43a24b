pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::Cli;
pub use crate::config::OrgConfig;

pub use crate::app::resources::{DocGenTemplates, Limit, Organization, TemplateType};
pub use crate::core::{ModelRepository, RestResourceClient, SaveMode};
pub use crate::domain::hydrate::{hydrate, HydrationReport};
pub use crate::domain::record::{FieldValue, Record};
pub use crate::domain::schema::AttributeSchema;
pub use crate::utils::error::{ApigeeError, Result};
