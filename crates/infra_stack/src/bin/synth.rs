use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use infra_stack::config::{hosted_zone_id_parameter, ConfigError};
use infra_stack::{
    synthesize, Environment, ParameterStore, StackConfig, StaticParameterStore, StreamsStack,
};

#[derive(Parser)]
#[command(
    name = "synth",
    about = "Synthesize the twitch-streams deployment plan",
    long_about = "Resolves configuration once at process entry, declares the\n\
                  resource graph and prints the deployment plan as JSON for\n\
                  the provisioning engine."
)]
struct Cli {
    /// Stack name used for physical-name derivation
    #[arg(long, default_value = "twitch-streams-dev")]
    stack_name: String,
    /// Parent domain whose zone delegates the subdomain
    #[arg(long, default_value = "nickswiss.io")]
    parent_domain: String,
    /// Subdomain label delegated out of the parent domain
    #[arg(long, default_value = "twitch-streams")]
    subdomain: String,
    /// Target account (defaults to CDK_DEFAULT_ACCOUNT)
    #[arg(long)]
    account: Option<String>,
    /// Target region (defaults to CDK_DEFAULT_REGION)
    #[arg(long)]
    region: Option<String>,
    /// Parent zone id for offline synthesis (skips the parameter store)
    #[arg(long)]
    parent_zone_id: Option<String>,
    /// Read the parent zone id from SSM instead of --parent-zone-id
    #[arg(long)]
    ssm: bool,
    /// Write the plan to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

/// SSM-backed parameter store. Lives here, not in the library: the
/// graph-construction path only ever sees a resolved `StackConfig`.
struct SsmParameterStore {
    client: aws_sdk_ssm::Client,
}

impl ParameterStore for SsmParameterStore {
    fn get(&self, name: &str) -> Result<String, ConfigError> {
        let client = self.client.clone();
        let parameter_name = name.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let response = client
                    .get_parameter()
                    .name(&parameter_name)
                    .send()
                    .await
                    .map_err(|error| {
                        ConfigError::Store(format!(
                            "failed to read parameter '{parameter_name}': {error}"
                        ))
                    })?;
                response
                    .parameter()
                    .and_then(|parameter| parameter.value())
                    .map(str::to_string)
                    .ok_or(ConfigError::MissingParameter(parameter_name))
            })
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let environment = Environment::resolve(cli.account.clone(), cli.region.clone())?;

    let config = if cli.ssm {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let store = SsmParameterStore {
            client: aws_sdk_ssm::Client::new(&aws_config),
        };
        StackConfig::resolve(
            &cli.stack_name,
            environment,
            &cli.parent_domain,
            &cli.subdomain,
            &store,
        )?
    } else {
        let parent_zone_id = cli.parent_zone_id.clone().ok_or_else(|| {
            ConfigError::Store(
                "either --ssm or --parent-zone-id is required for synthesis".to_string(),
            )
        })?;
        let store = StaticParameterStore::new().with(
            hosted_zone_id_parameter(&cli.parent_domain),
            parent_zone_id,
        );
        StackConfig::resolve(
            &cli.stack_name,
            environment,
            &cli.parent_domain,
            &cli.subdomain,
            &store,
        )?
    };

    info!(stack = %config.stack_name, region = %config.environment.region, "declaring stack");
    let stack = StreamsStack::declare(config)?;
    let plan = synthesize(&stack)?;
    let rendered = serde_json::to_string_pretty(&plan)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!(path = %path.display(), resources = plan.resources.len(), "plan written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
