//! `ihome` command-line client for the iHome dormitory portal.
//!
//! Run with: `ihome <command>`
//!
//! Results are printed as JSON on stdout; logs go to stderr through
//! `tracing`. `println!` and `eprintln!` are used for user-facing output.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use ihome_common::{FileSessionStorage, MemorySessionStorage, SessionManager, SessionStorage};
use ihome_domain::Config;
use ihome_infra::{config, observability, ApiClient, ApiClientConfig, LoggingNavigator, TracingNotifier};

mod commands;

use commands::Command;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();

    let command = match Command::parse(&args) {
        Ok(Command::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}");
            eprintln!();
            print_help();
            return ExitCode::FAILURE;
        }
    };

    match run(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Command failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load().context("Failed to load configuration")?;
    observability::init_tracing(&config.logging).context("Failed to initialize logging")?;

    let client = build_client(&config).await?;
    let output = command.run(&client).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn build_client(config: &Config) -> anyhow::Result<ApiClient> {
    let storage: Arc<dyn SessionStorage> = if config.session.storage_path.is_empty() {
        tracing::debug!("Session kept in memory only");
        Arc::new(MemorySessionStorage::new())
    } else {
        Arc::new(FileSessionStorage::new(&config.session.storage_path))
    };

    let session = Arc::new(SessionManager::new(storage));
    session.initialize().await.context("Failed to load persisted session")?;

    let client = ApiClient::new(
        ApiClientConfig::from(&config.api),
        session,
        Arc::new(TracingNotifier),
        Arc::new(LoggingNavigator),
    )?;
    Ok(client)
}

fn print_help() {
    println!("iHome portal client");
    println!();
    println!("USAGE:");
    println!("    ihome <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    login <student|admin> <id> <password>  Sign in and persist the session");
    println!("    logout                                 Clear the persisted session");
    println!("    whoami                                 Show the signed-in user");
    println!("    notifications                          List notifications for the signed-in user");
    println!("    dorms [page] [size]                    List dormitories");
    println!("    get <path>                             GET any API path and print its data");
    println!("    help                                   Show this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    IHOME_API_BASE_URL (required), IHOME_API_TIMEOUT_MS, IHOME_REFRESH_PATH,");
    println!("    IHOME_LOGIN_ROUTE, IHOME_USER_AGENT, IHOME_SESSION_PATH, IHOME_LOG_FILTER,");
    println!("    IHOME_LOG_JSON, or config.{{json,toml}} / ihome.{{json,toml}}");
}
