//! Refresh command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct RefreshArgs {}

pub async fn run(_args: RefreshArgs) -> Result<()> {
    let session = storage::load_session()
        .context("Failed to load session")?
        .context("No active session. Run 'storefront auth login' first.")?;

    output::status("Refreshing session...");
    let result = session.client().refresh().await;

    storage::persist(&session).context("Failed to save refreshed session")?;
    result.context("Failed to refresh session")?;

    output::success("Session refreshed successfully");
    Ok(())
}
