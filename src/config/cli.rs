use super::{OrgConfig, DEFAULT_ENDPOINT};
use crate::utils::error::{ApigeeError, Result};
use clap::{Parser, Subcommand};
use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Parser)]
#[command(name = "apigee-client")]
#[command(about = "Query the Apigee management API")]
pub struct Cli {
    /// TOML file with the organization settings; flags override it.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    #[arg(long, env = "APIGEE_ENDPOINT")]
    pub endpoint: Option<String>,

    #[arg(long, env = "APIGEE_ORG")]
    pub org: Option<String>,

    #[arg(long, env = "APIGEE_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "APIGEE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, env = "APIGEE_TOKEN", hide_env_values = true, conflicts_with = "username")]
    pub token: Option<String>,

    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(long, short = 'v', help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Limits applying to a developer.
    Limits {
        #[arg(long)]
        developer: String,
        #[arg(long)]
        package: Option<String>,
        #[arg(long)]
        halt: Option<bool>,
    },
    /// A single limit by id.
    Limit { id: String },
    /// The configured organization's monetization profile.
    Organization,
    IndexTemplate { api: String },
    OperationTemplate { api: String },
}

fn masked(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "***")
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("config", &self.config)
            .field("endpoint", &self.endpoint)
            .field("org", &self.org)
            .field("username", &self.username)
            .field("password", &masked(&self.password))
            .field("token", &masked(&self.token))
            .field("timeout", &self.timeout)
            .field("verbose", &self.verbose)
            .field("json_logs", &self.json_logs)
            .field("command", &self.command)
            .finish()
    }
}

impl Cli {
    /// Merges the optional config file with the command-line flags.
    pub fn into_org_config(&self) -> Result<OrgConfig> {
        let mut config = match &self.config {
            Some(path) => OrgConfig::from_file(path)?,
            None => {
                let org = self
                    .org
                    .clone()
                    .ok_or_else(|| ApigeeError::config("org", "--org or --config is required"))?;
                OrgConfig::new(DEFAULT_ENDPOINT, org)
            }
        };

        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(org) = &self.org {
            config.org_name = org.clone();
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        config = match (&self.username, &self.password, &self.token) {
            (Some(username), password, None) => {
                config.with_basic_auth(username.clone(), password.clone().unwrap_or_default())
            }
            (None, _, Some(token)) => config.with_bearer_token(token.clone()),
            _ => config,
        };

        Ok(config)
    }
}
