//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs) -> Result<()> {
    let Some(session) = storage::load_session().context("Failed to load session")? else {
        output::status("No active session.");
        return Ok(());
    };

    output::status("Logging out...");
    if let Err(e) = session.client().logout().await {
        output::warn(&format!("Server did not confirm logout: {e}"));
    }

    storage::clear_session().context("Failed to remove session")?;
    output::success("Logged out");

    Ok(())
}
