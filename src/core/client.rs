use crate::domain::model::{
    Body, ContentType, Credentials, HttpMethod, RequestOptions, ResourcePath, ResourceRequest,
};
use crate::domain::ports::{ConfigProvider, ResourceTransport};
use crate::utils::error::{ApigeeError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Builds the absolute URL of one call.
///
/// Path segments are percent-encoded individually; `.` and `..` are rejected
/// since URL normalization would drop them. Query pairs from the base path,
/// the resource path and the per-call options are appended in that order.
pub fn resolve_url(
    endpoint: &Url,
    base_path: &ResourcePath,
    path: &ResourcePath,
    query: &[(String, String)],
) -> Result<Url> {
    if let Some(dot) = base_path
        .segments()
        .iter()
        .chain(path.segments())
        .find(|s| matches!(s.as_str(), "." | ".."))
    {
        return Err(ApigeeError::validation(
            "path",
            dot,
            "dot segments are not valid resource identifiers",
        ));
    }

    let mut url = endpoint.clone();
    url.set_query(None);
    url.set_fragment(None);

    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            ApigeeError::config("endpoint", format!("'{}' cannot be used as a base URL", endpoint))
        })?;
        segments
            .pop_if_empty()
            .extend(base_path.segments())
            .extend(path.segments());
    }

    let pairs: Vec<&(String, String)> = base_path
        .query_pairs()
        .iter()
        .chain(path.query_pairs())
        .chain(query)
        .collect();
    if !pairs.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    Ok(url)
}

fn parse_body(endpoint: &str, content_type: ContentType, text: String) -> Result<Body> {
    match content_type {
        ContentType::Html => Ok(Body::Text(text)),
        ContentType::Json if text.trim().is_empty() => Ok(Body::Json(Value::Null)),
        ContentType::Json => serde_json::from_str(&text)
            .map(Body::Json)
            .map_err(|e| ApigeeError::FormatError {
                endpoint: endpoint.to_string(),
                message: format!("invalid JSON: {}", e),
            }),
    }
}

/// HTTP client rooted at `<endpoint>/<base path>`.
///
/// Holds only immutable configuration; a per-call base path goes through
/// [`RequestOptions::base_path`] instead of mutating the client.
#[derive(Debug, Clone)]
pub struct RestResourceClient {
    client: Client,
    endpoint: Url,
    base_path: ResourcePath,
    credentials: Option<Credentials>,
}

impl RestResourceClient {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C, base_path: ResourcePath) -> Result<Self> {
        let endpoint = Url::parse(config.endpoint()).map_err(|e| {
            ApigeeError::config("endpoint", format!("Invalid URL '{}': {}", config.endpoint(), e))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(ApigeeError::config(
                "endpoint",
                format!("'{}' cannot be used as a base URL", endpoint),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| ApigeeError::config("http_client", format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            base_path,
            credentials: config.credentials().cloned(),
        })
    }

    /// Client rooted directly at the configured endpoint.
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(config, ResourcePath::root())
    }

    /// Same connection, different base path.
    pub fn with_base_path(&self, base_path: ResourcePath) -> Self {
        Self {
            base_path,
            ..self.clone()
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn base_path(&self) -> &ResourcePath {
        &self.base_path
    }

    pub fn url_for(&self, path: &ResourcePath, options: &RequestOptions) -> Result<Url> {
        let base_path = options.base_path.as_ref().unwrap_or(&self.base_path);
        resolve_url(&self.endpoint, base_path, path, &options.query)
    }

    pub async fn get(
        &self,
        path: &ResourcePath,
        response_type: ContentType,
        extra_headers: &[(&str, &str)],
        options: Option<RequestOptions>,
    ) -> Result<Body> {
        let request = ResourceRequest::get(path.clone(), response_type)
            .headers(extra_headers)
            .options(options.unwrap_or_default());
        self.execute(request).await
    }

    pub async fn post(
        &self,
        path: &ResourcePath,
        body: Body,
        request_type: ContentType,
        response_type: ContentType,
        extra_headers: &[(&str, &str)],
    ) -> Result<Body> {
        let request =
            ResourceRequest::with_body(HttpMethod::Post, path.clone(), body, request_type, response_type)
                .headers(extra_headers);
        self.execute(request).await
    }

    pub async fn put(
        &self,
        path: &ResourcePath,
        body: Body,
        request_type: ContentType,
        response_type: ContentType,
        extra_headers: &[(&str, &str)],
    ) -> Result<Body> {
        let request =
            ResourceRequest::with_body(HttpMethod::Put, path.clone(), body, request_type, response_type)
                .headers(extra_headers);
        self.execute(request).await
    }

    fn build_headers(&self, request: &ResourceRequest) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(request.response_type.mime()));
        if request.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(request.request_type.mime()));
        }

        for (key, value) in &request.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| ApigeeError::validation("headers", key, e.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApigeeError::validation(key.as_str(), value, e.to_string()))?;
            headers.insert(name, value);
        }

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl ResourceTransport for RestResourceClient {
    async fn execute(&self, request: ResourceRequest) -> Result<Body> {
        let url = self.url_for(&request.path, &request.options)?;
        let endpoint = url.to_string();
        let headers = self.build_headers(&request)?;

        tracing::debug!(method = %request.method, url = %endpoint, "Sending management API request");

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
        }
        .headers(headers);

        builder = match &self.credentials {
            Some(Credentials::Basic { username, password }) => {
                builder.basic_auth(username, Some(password))
            }
            Some(Credentials::Bearer { token }) => builder.bearer_auth(token),
            None => builder,
        };

        if let Some(body) = request.body {
            let payload = match body {
                Body::Json(value) => serde_json::to_string(&value)?,
                Body::Text(text) => text,
            };
            builder = builder.body(payload);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| ApigeeError::TransportError {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %endpoint, "Management API responded");

        let text = response
            .text()
            .await
            .map_err(|source| ApigeeError::TransportError {
                endpoint: endpoint.clone(),
                source,
            })?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %endpoint, "Management API request failed");
            return Err(ApigeeError::ApiError {
                endpoint,
                status: status.as_u16(),
                body: text,
            });
        }

        parse_body(&endpoint, request.response_type, text)
    }
}
