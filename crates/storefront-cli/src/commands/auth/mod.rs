//! Session subcommands.

mod login;
mod logout;
mod refresh;
mod whoami;

use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Log in and store the session
    Login(login::LoginArgs),

    /// End the session on the server and forget it locally
    Logout(logout::LogoutArgs),

    /// Display the active session
    Whoami(whoami::WhoamiArgs),

    /// Refresh the session credential
    Refresh(refresh::RefreshArgs),
}

pub async fn handle(cmd: AuthCommand, api_url: Option<&str>) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login::run(args, api_url).await,
        AuthSubcommand::Logout(args) => logout::run(args).await,
        AuthSubcommand::Whoami(args) => whoami::run(args).await,
        AuthSubcommand::Refresh(args) => refresh::run(args).await,
    }
}
