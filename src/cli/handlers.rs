use crate::cli::commands::{Args, Commands};
use crate::cli::config::Config;
use crate::credentials::{PagarMeApi, PagarMeClient};
use crate::error::NodeError;
use crate::executor::{ExecutionPolicy, OrderExecutor};
use crate::node_registry;
use crate::order::CheckoutSettings;
use crate::parameters::NodeParameters;
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::info;

/// Reads items as a YAML or JSON document. A single object counts as one item.
pub fn load_items(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let doc: Value = serde_yaml::from_str(&content)?;
    Ok(match doc {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    })
}

pub fn load_params(path: Option<&Path>) -> Result<NodeParameters> {
    match path {
        Some(p) => {
            let content = fs::read_to_string(p).with_context(|| format!("Failed to read {}", p.display()))?;
            Ok(serde_yaml::from_str(&content)?)
        }
        None => Ok(NodeParameters::default()),
    }
}

pub async fn handle_command(args: Args) -> Result<()> {
    let config_path = args.config.as_deref();
    match args.command {
        Commands::Run { input, params, token, success_url, api_base, continue_on_fail } => {
            let config = Config::load(config_path)?;
            let token = config
                .resolve_token(token)
                .ok_or_else(|| NodeError::Configuration("No Pagar.me token configured (use --token, PAGARME_TOKEN or `configure`)".to_string()))?;

            let mut client = PagarMeClient::new(PagarMeApi::new(token));
            if let Some(base) = api_base.or(config.api_base) {
                client = client.with_base_url(base);
            }

            let checkout = match success_url.or(config.success_url) {
                Some(success_url) => CheckoutSettings { success_url },
                None => CheckoutSettings::default(),
            };
            let policy = ExecutionPolicy {
                continue_on_fail: continue_on_fail || config.continue_on_fail.unwrap_or(false),
            };

            let executor = OrderExecutor::new(Box::new(client), load_params(params.as_deref())?)?
                .with_checkout(checkout)
                .with_policy(policy);

            let items = load_items(&input)?;
            info!(count = items.len(), "Submitting orders");
            let output = executor.execute(&items).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Describe => {
            let description = json!({
                "node": node_registry::node_description(),
                "credential": node_registry::credential_description(),
            });
            println!("{}", serde_json::to_string_pretty(&description)?);
        }
        Commands::Configure { token, success_url, api_base, continue_on_fail } => {
            let mut config = Config::load(config_path)?;
            if token.is_some() {
                config.token = token;
            }
            if success_url.is_some() {
                config.success_url = success_url;
            }
            if api_base.is_some() {
                config.api_base = api_base;
            }
            if continue_on_fail.is_some() {
                config.continue_on_fail = continue_on_fail;
            }
            let path = config.save(config_path)?;
            println!("Configuration saved to {}", path.display());
        }
    }
    Ok(())
}
