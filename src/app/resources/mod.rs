//! Concrete management API resources built on the generic repository.

pub mod docgen;
pub mod limit;
pub mod organization;

pub use docgen::{DocGenTemplates, TemplateType};
pub use limit::Limit;
pub use organization::Organization;
