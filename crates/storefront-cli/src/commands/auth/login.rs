//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;

use storefront_core::{ApiUrl, Credentials};

use crate::output;
use crate::session::CliSession;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Username or e-mail address
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Use the `/api/auth/login_check` route
    #[arg(long)]
    pub nested_login: bool,
}

pub async fn run(args: LoginArgs, api_url: Option<&str>) -> Result<()> {
    let api_url = match api_url {
        Some(url) => ApiUrl::new(url).context("Invalid API URL")?,
        None => storage::load_session()?
            .map(|s| s.api_url().clone())
            .context("No API URL. Pass --api-url or set STOREFRONT_API_URL.")?,
    };

    let session = CliSession::new(api_url, args.nested_login)?;
    let credentials = Credentials::new(&args.username, &args.password);

    output::status("Logging in...");
    let identity = session
        .client()
        .login(&credentials)
        .await
        .context("Failed to login")?;

    storage::save_session(&session).context("Failed to save session")?;

    output::success("Logged in successfully");
    println!();
    output::field("User", identity.display_name().unwrap_or(&args.username));
    output::field("Role", &format!("{:?}", identity.role()).to_lowercase());
    output::field("API", session.api_url().as_str());

    Ok(())
}
