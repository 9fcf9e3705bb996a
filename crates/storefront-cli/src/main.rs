//! storefront - command-line client for the storefront API.
//!
//! A thin wrapper over `storefront-http` for poking at a running API:
//! log in once, then browse the catalogue, manage categories and orders.
//! The session is kept on disk between invocations.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{auth, categories, orders, products, users};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    let api_url = cli.api_url.as_deref();
    match cli.command {
        Commands::Auth(cmd) => auth::handle(cmd, api_url).await,
        Commands::Products(cmd) => products::handle(cmd, api_url).await,
        Commands::Categories(cmd) => categories::handle(cmd, api_url).await,
        Commands::Orders(cmd) => orders::handle(cmd, api_url).await,
        Commands::Users(cmd) => users::handle(cmd, api_url).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
