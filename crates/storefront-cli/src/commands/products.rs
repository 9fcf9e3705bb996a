//! Product subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::output;
use crate::session::{CliSession, storage};

#[derive(Args, Debug)]
pub struct ProductsCommand {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: ProductsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProductsSubcommand {
    /// List products
    List {
        /// Maximum number of products
        #[arg(long, conflicts_with = "category")]
        limit: Option<u32>,

        /// Only products in the category with this slug
        #[arg(long)]
        category: Option<String>,
    },

    /// Fetch one product
    Get { id: u64 },

    /// Search the catalogue
    Search { query: String },

    /// Delete a product (admin)
    Delete { id: u64 },
}

pub async fn handle(cmd: ProductsCommand, api_url: Option<&str>) -> Result<()> {
    let session = match cmd.command {
        ProductsSubcommand::Delete { .. } => storage::require(api_url)?,
        _ => storage::open(api_url)?,
    };
    let result = dispatch(&session, cmd).await;
    storage::persist(&session)?;
    result
}

async fn dispatch(session: &CliSession, cmd: ProductsCommand) -> Result<()> {
    let products = session.client().products();

    let found = match cmd.command {
        ProductsSubcommand::List {
            category: Some(slug),
            ..
        } => products.by_category(&slug).await.map(|l| l.data),
        ProductsSubcommand::List {
            limit,
            category: None,
        } => products.list(limit).await.map(|l| l.data),
        ProductsSubcommand::Get { id } => products.get(id).await.map(|p| vec![p]),
        ProductsSubcommand::Search { query } => products.search(&query).await,
        ProductsSubcommand::Delete { id } => {
            products
                .delete(id)
                .await
                .with_context(|| format!("Failed to delete product {id}"))?;
            output::success(&format!("Deleted product {id}"));
            return Ok(());
        }
    };

    let found = found.context("Failed to fetch products")?;
    output::lines(&found, cmd.pretty)
}
