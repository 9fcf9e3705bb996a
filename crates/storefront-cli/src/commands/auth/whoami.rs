//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(_args: WhoamiArgs) -> Result<()> {
    let session = storage::load_session()
        .context("Failed to load session")?
        .context("No active session. Run 'storefront auth login' first.")?;

    output::field("API", session.api_url().as_str());
    match session.client().identity() {
        Some(identity) => {
            if let Some(name) = identity.display_name() {
                output::field("User", name);
            }
            if let Some(id) = identity.id {
                output::field("Id", &id.to_string());
            }
            output::field("Role", &format!("{:?}", identity.role()).to_lowercase());
        }
        None => output::field("User", "(unknown)"),
    }

    Ok(())
}
