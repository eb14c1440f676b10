//! cmdexec - run commands over HTTP
//!
//! Exposes `POST /execute/`, which takes `{"command": "<string>"}`, splits the
//! string on whitespace and runs it without a shell. The response is
//! `{"output": stdout}` when the process exits with code 0, and
//! `{"error": stderr}` otherwise.
//!
//! There is no authentication or sandboxing: anyone who can reach the
//! listener can run programs with the privileges of this process. Bind it
//! to a trusted interface only.

mod api;
mod cli;
mod config;
mod error;
mod host;
mod logging;
mod server;

use clap::Parser;
use cli::{exit_codes, Cli};

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::CONFIG_ERROR;
        }
    };

    // Initialize logging
    if let Err(e) = logging::init(&config.log) {
        eprintln!("Failed to initialize logging: {}", e);
        return exit_codes::UNEXPECTED_FAILURE;
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create runtime: {}", e);
            return exit_codes::UNEXPECTED_FAILURE;
        }
    };

    rt.block_on(async {
        match serve(&config).await {
            Ok(()) => exit_codes::SUCCESS,
            Err(e) => {
                tracing::error!("{:#}", e);
                categorize_error(&e)
            }
        }
    })
}

async fn serve(config: &config::ServerConfig) -> anyhow::Result<()> {
    let server = server::Server::bind(config).await?;

    server.run(server::shutdown_signal()).await?;
    tracing::info!("Server stopped");
    Ok(())
}

/// Categorize an error into the appropriate exit code
fn categorize_error(e: &anyhow::Error) -> i32 {
    if e.downcast_ref::<server::BindError>().is_some() {
        exit_codes::BIND_FAILURE
    } else {
        exit_codes::UNEXPECTED_FAILURE
    }
}
