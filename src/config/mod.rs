#[cfg(feature = "cli")]
pub mod cli;

use crate::domain::model::Credentials;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ApigeeError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "https://api.enterprise.apigee.com/v1";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_user_agent() -> String {
    format!("apigee-client/{}", env!("CARGO_PKG_VERSION"))
}

/// Connection details for one Apigee organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub org_name: String,
    #[serde(default)]
    pub credentials: Option<Credentials>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl OrgConfig {
    pub fn new(endpoint: impl Into<String>, org_name: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            org_name: org_name.into(),
            credentials: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: default_user_agent(),
        }
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Basic {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Bearer {
            token: token.into(),
        });
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Loads a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after replacing `${VAR}` with environment values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;

        toml::from_str(&processed)
            .map_err(|e| ApigeeError::config("toml_parsing", format!("TOML parsing error: {}", e)))
    }

    /// Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ApigeeError::config("toml_parsing", e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("endpoint", &self.endpoint)?;
        validate_non_empty_string("org_name", &self.org_name)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 600)?;

        match &self.credentials {
            Some(Credentials::Basic { username, .. }) => {
                validate_non_empty_string("credentials.username", username)?
            }
            Some(Credentials::Bearer { token }) => {
                validate_non_empty_string("credentials.token", token)?
            }
            None => tracing::debug!("No credentials configured; requests will be anonymous"),
        }

        Ok(())
    }
}

impl ConfigProvider for OrgConfig {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn org_name(&self) -> &str {
        &self.org_name
    }

    fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl Validate for OrgConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
