//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::auth::AuthCommand;
use crate::commands::categories::CategoriesCommand;
use crate::commands::orders::OrdersCommand;
use crate::commands::products::ProductsCommand;
use crate::commands::users::UsersCommand;

/// Command-line client for the storefront API.
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(author, version = env!("STOREFRONT_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// API base URL (defaults to the one stored with the session)
    #[arg(long, global = true, env = "STOREFRONT_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in, log out and inspect the session
    Auth(AuthCommand),

    /// Browse and manage the catalogue
    Products(ProductsCommand),

    /// Manage product categories
    Categories(CategoriesCommand),

    /// Manage your orders
    Orders(OrdersCommand),

    /// Administer users
    Users(UsersCommand),
}
