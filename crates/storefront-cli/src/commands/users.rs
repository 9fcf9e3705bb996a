//! User administration subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct UsersCommand {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersSubcommand {
    /// List every user (admin)
    List,
}

pub async fn handle(cmd: UsersCommand, api_url: Option<&str>) -> Result<()> {
    let session = storage::require(api_url)?;

    match cmd.command {
        UsersSubcommand::List => {
            let result = session.client().users().list().await;
            storage::persist(&session)?;
            let users = result.context("Failed to list users")?;
            output::lines(&users, cmd.pretty)
        }
    }
}
