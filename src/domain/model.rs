use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Body encodings the management API speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Json,
    Html,
}

impl ContentType {
    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json; charset=utf-8",
            ContentType::Html => "text/html",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        })
    }
}

/// Request or response payload: parsed JSON or opaque text.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
}

impl Body {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(v) => Some(v),
            Body::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Body::Json(v) => Some(v),
            Body::Text(_) => None,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Body::Text(s) => s,
            Body::Json(v) => v.to_string(),
        }
    }
}

/// Path below an endpoint, kept as unencoded segments plus query pairs.
///
/// Segments are percent-encoded only when the final URL is built, so an
/// organization name or identifier containing `/` or spaces stays a single
/// segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePath {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl ResourcePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Splits a literal `a/b/c` path. Use [`ResourcePath::segment`] for
    /// user-supplied values.
    pub fn parse(raw: &str) -> Self {
        Self {
            segments: raw
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            query: Vec::new(),
        }
    }

    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// `self` followed by the segments and query of `other`.
    pub fn join(&self, other: &ResourcePath) -> ResourcePath {
        let mut joined = self.clone();
        joined.segments.extend(other.segments.iter().cloned());
        joined.query.extend(other.query.iter().cloned());
        joined
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty() && self.query.is_empty()
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))?;
        for (i, (k, v)) in self.query.iter().enumerate() {
            write!(f, "{}{}={}", if i == 0 { '?' } else { '&' }, k, v)?;
        }
        Ok(())
    }
}

/// Per-call knobs for a GET.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    /// Replaces the client's base path for this call only.
    pub base_path: Option<ResourcePath>,
}

impl RequestOptions {
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_base_path(mut self, base_path: ResourcePath) -> Self {
        self.base_path = Some(base_path);
        self
    }
}

/// One fully described exchange with the management API.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequest {
    pub method: HttpMethod,
    pub path: ResourcePath,
    pub body: Option<Body>,
    pub request_type: ContentType,
    pub response_type: ContentType,
    pub headers: Vec<(String, String)>,
    pub options: RequestOptions,
}

impl ResourceRequest {
    pub fn get(path: ResourcePath, response_type: ContentType) -> Self {
        Self {
            method: HttpMethod::Get,
            path,
            body: None,
            request_type: response_type,
            response_type,
            headers: Vec::new(),
            options: RequestOptions::default(),
        }
    }

    pub fn with_body(
        method: HttpMethod,
        path: ResourcePath,
        body: Body,
        request_type: ContentType,
        response_type: ContentType,
    ) -> Self {
        Self {
            method,
            path,
            body: Some(body),
            request_type,
            response_type,
            headers: Vec::new(),
            options: RequestOptions::default(),
        }
    }

    pub fn headers(mut self, headers: &[(&str, &str)]) -> Self {
        self.headers
            .extend(headers.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// Authentication for the management API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Credentials {
    Basic { username: String, password: String },
    Bearer { token: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Credentials::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
        }
    }
}
