//! mcp-gateway binary entry point.

use std::process::ExitCode;
use std::sync::Arc;

use mcp_gateway::api::{serve_with_state, AppState};
use mcp_gateway::cli::{parse_args, print_help, print_version};
use mcp_gateway::config::Config;
use mcp_gateway::dispatch::Dispatcher;
use mcp_gateway::logging;
use mcp_gateway::provider::GitHubProvider;
use mcp_gateway::session::{spawn_sweeper, SessionStore};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run with --help for usage.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_with_filter(config.log_filter());

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("mcp-gateway v{}", env!("CARGO_PKG_VERSION"));

    let server_config = config.to_server_config()?;
    let provider = Arc::new(GitHubProvider::new(config.github_config())?);
    info!(
        api = %provider.config().api_base_url,
        timeout = ?provider.config().timeout,
        "GitHub provider configured"
    );

    let store = Arc::new(SessionStore::new());
    let dispatcher =
        Dispatcher::new(Arc::clone(&store), provider).with_config(config.to_dispatcher_config());

    let sweeper = config.session_ttl().map(|ttl| {
        info!(ttl = ?ttl, interval = ?config.sweep_interval(), "idle session expiry enabled");
        spawn_sweeper(Arc::clone(&store), ttl, config.sweep_interval())
    });

    let result = serve_with_state(server_config, AppState::new(Arc::new(dispatcher))).await;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    info!(sessions = store.count(), "server stopped");

    Ok(result?)
}
