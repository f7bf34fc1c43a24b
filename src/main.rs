use apigee_client::config::cli::{Cli, Command};
use apigee_client::core::Model;
use apigee_client::utils::error::{ApigeeError, ErrorSeverity};
use apigee_client::utils::{logger, validation::Validate};
use apigee_client::{DocGenTemplates, Limit, ModelRepository, Organization, OrgConfig, RestResourceClient};
use clap::Parser;
use serde_json::Value;

enum Output {
    Json(Value),
    Html(String),
}

async fn run(command: &Command, config: &OrgConfig) -> Result<Output, ApigeeError> {
    let client = RestResourceClient::from_config(config)?;
    let org = config.org_name.as_str();

    let output = match command {
        Command::Limits {
            developer,
            package,
            halt,
        } => {
            let repo: ModelRepository<Limit, _> = ModelRepository::new(client, org);
            let limits = repo
                .developer_limits(developer, package.as_deref(), *halt)
                .await?;
            tracing::info!(count = limits.len(), developer = %developer, "Fetched developer limits");
            Output::Json(Value::Array(
                limits
                    .iter()
                    .map(|l| Value::Object(l.record().to_mapping()))
                    .collect(),
            ))
        }
        Command::Limit { id } => {
            let repo: ModelRepository<Limit, _> = ModelRepository::new(client, org);
            let limit = repo.load(id).await?;
            Output::Json(Value::Object(limit.record().to_mapping()))
        }
        Command::Organization => {
            let repo: ModelRepository<Organization, _> = ModelRepository::new(client, org);
            let organization = repo.load(org).await?;
            Output::Json(Value::Object(organization.record().to_mapping()))
        }
        Command::IndexTemplate { api } => {
            Output::Html(DocGenTemplates::new(client, org).index_template(api).await?)
        }
        Command::OperationTemplate { api } => {
            Output::Html(DocGenTemplates::new(client, org).operation_template(api).await?)
        }
    };

    Ok(output)
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logger first so config errors are reported
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting apigee-client");
    if cli.verbose {
        tracing::debug!("CLI arguments: {:?}", cli);
    }

    // Build and validate the organization config
    let config = match cli.into_org_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Could not load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("🔗 Using {} for organization '{}'", config.endpoint, config.org_name);

    match run(&cli.command, &config).await {
        Ok(Output::Json(value)) => {
            tracing::info!("✅ Request completed");
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Ok(Output::Html(html)) => {
            tracing::info!("✅ Template fetched ({} bytes)", html.len());
            println!("{}", html);
        }
        Err(e) => {
            tracing::error!(
                "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());

            // Exit code follows error severity
            let code = exit_code(e.severity());
            if code > 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}
