use anyhow::Result;
use broadridge::commands::{self, ConfigureOptions};
use clap::Parser;
use reqwest::Method;
use std::path::PathBuf;

/// broadridge - Broadridge partner API client
///
/// Stores the API token, endpoint and version, and issues authorized
/// requests against the partner REST API.
///
/// Examples:
///   broadridge configure --token abc123 --endpoint https://mp-advisor.marketpower.com/rest/partner --api-version 2.5
///   broadridge get /inventory.json -p page=1
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings state file (defaults to <config dir>/broadridge/state.json; also via BROADRIDGE_STATE)
    #[arg(
        long = "state",
        short = 's',
        env = "BROADRIDGE_STATE",
        value_name = "PATH",
        global = true
    )]
    pub state_path: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Store connection settings and verify them with a live request
    Configure(ConfigureArgs),

    /// Show the stored connection settings
    Show,

    /// Send a GET request to an API path
    Get(CallArgs),

    /// Send a POST request to an API path (parameters go in the query string)
    Post(CallArgs),
}

#[derive(clap::Args, Debug)]
pub struct ConfigureArgs {
    /// Token used to authenticate API calls
    #[arg(long = "token", value_name = "TOKEN")]
    pub access_token: Option<String>,

    /// Partner endpoint URL without trailing slash, e.g. https://mp-advisor.marketpower.com/rest/partner
    #[arg(long = "endpoint", value_name = "URL")]
    pub api_endpoint: Option<String>,

    /// API version to request, e.g. 2.5
    #[arg(long = "api-version", value_name = "VERSION")]
    pub api_version: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct CallArgs {
    /// Path appended to the endpoint, e.g. /inventory.json
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Query parameter, may be repeated
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = broadridge::runtime::RealRuntime;

    match cli.command {
        Commands::Configure(args) => {
            let options = ConfigureOptions {
                access_token: args.access_token,
                api_endpoint: args.api_endpoint,
                api_version: args.api_version,
            };
            commands::configure(runtime, cli.state_path, options).await?
        }
        Commands::Show => commands::show(runtime, cli.state_path)?,
        Commands::Get(args) => {
            commands::call(runtime, cli.state_path, Method::GET, &args.path, &args.params).await?
        }
        Commands::Post(args) => {
            commands::call(runtime, cli.state_path, Method::POST, &args.path, &args.params).await?
        }
    }
    Ok(())
}
