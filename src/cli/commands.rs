use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Create Pagar.me checkout orders from item files", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create one order per input item
    Run {
        /// Path to the items file (JSON or YAML array)
        #[arg(short, long)]
        input: PathBuf,
        /// Node parameters file (resource, operation, field expressions)
        #[arg(short, long)]
        params: Option<PathBuf>,
        /// API token, sent as `Authorization: Basic <token>`
        #[arg(long, env = "PAGARME_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// Checkout success URL
        #[arg(long)]
        success_url: Option<String>,
        /// API base URL
        #[arg(long)]
        api_base: Option<String>,
        /// Record failed items in the output instead of stopping
        #[arg(long)]
        continue_on_fail: bool,
    },
    /// Print the node and credential descriptions as JSON
    Describe,
    /// Save defaults to the config file
    Configure {
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        success_url: Option<String>,
        #[arg(long)]
        api_base: Option<String>,
        #[arg(long)]
        continue_on_fail: Option<bool>,
    },
}
