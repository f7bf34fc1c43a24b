//! HTML templates used by the portal to render API model documentation.

use crate::domain::model::{Body, ContentType, HttpMethod, RequestOptions, ResourcePath, ResourceRequest};
use crate::domain::ports::ResourceTransport;
use crate::utils::error::Result;
use std::fmt;

const TEMPLATE_NAME: &str = "drupal-cms";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateType {
    /// Overview page of an API model.
    Index,
    /// Page of a single operation.
    Method,
}

impl TemplateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Index => "index",
            TemplateType::Method => "method",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct DocGenTemplates<T: ResourceTransport> {
    transport: T,
    base_path: ResourcePath,
}

impl<T: ResourceTransport> DocGenTemplates<T> {
    pub fn new(transport: T, org_name: &str) -> Self {
        Self {
            transport,
            base_path: ResourcePath::parse("o").segment(org_name).segment("apimodels"),
        }
    }

    pub fn base_path(&self) -> &ResourcePath {
        &self.base_path
    }

    pub async fn index_template(&self, api_id: &str) -> Result<String> {
        self.fetch(api_id, TemplateType::Index).await
    }

    pub async fn operation_template(&self, api_id: &str) -> Result<String> {
        self.fetch(api_id, TemplateType::Method).await
    }

    pub async fn save_template(&self, api_id: &str, template_type: TemplateType, html: &str) -> Result<String> {
        let path = ResourcePath::root()
            .segment(api_id)
            .segment("templates")
            .query("type", template_type.as_str())
            .query("name", TEMPLATE_NAME);
        self.send(HttpMethod::Post, path, html).await
    }

    pub async fn update_template(&self, api_id: &str, template_type: TemplateType, html: &str) -> Result<String> {
        self.send(HttpMethod::Put, template_path(api_id, template_type), html).await
    }

    async fn fetch(&self, api_id: &str, template_type: TemplateType) -> Result<String> {
        let request = ResourceRequest::get(template_path(api_id, template_type), ContentType::Html)
            .options(self.options());
        let body = self.transport.execute(request).await?;
        Ok(body.into_text())
    }

    async fn send(&self, method: HttpMethod, path: ResourcePath, html: &str) -> Result<String> {
        let request = ResourceRequest::with_body(
            method,
            path,
            Body::Text(html.to_string()),
            ContentType::Html,
            ContentType::Html,
        )
        .options(self.options());

        tracing::info!(%method, base = %self.base_path, "Writing doc template");
        let body = self.transport.execute(request).await?;
        Ok(body.into_text())
    }

    fn options(&self) -> RequestOptions {
        RequestOptions::default().with_base_path(self.base_path.clone())
    }
}

fn template_path(api_id: &str, template_type: TemplateType) -> ResourcePath {
    ResourcePath::root()
        .segment(api_id)
        .segment("templates")
        .segment(TEMPLATE_NAME)
        .query("type", template_type.as_str())
}
