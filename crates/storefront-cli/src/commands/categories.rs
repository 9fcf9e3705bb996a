//! Category subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use storefront_core::resources::CategoryInput;

use crate::output;
use crate::session::{CliSession, storage};

#[derive(Args, Debug)]
pub struct CategoriesCommand {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: CategoriesSubcommand,
}

#[derive(Args, Debug)]
pub struct CategoryFields {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub slug: String,

    #[arg(long, default_value = "")]
    pub description: String,
}

impl From<CategoryFields> for CategoryInput {
    fn from(fields: CategoryFields) -> Self {
        CategoryInput {
            name: fields.name,
            description: fields.description,
            slug: fields.slug,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CategoriesSubcommand {
    /// List categories
    List,

    /// Create a category (admin)
    Create(CategoryFields),

    /// Update a category (admin)
    Update {
        id: u64,

        #[command(flatten)]
        fields: CategoryFields,
    },

    /// Delete a category (admin)
    Delete { id: u64 },
}

pub async fn handle(cmd: CategoriesCommand, api_url: Option<&str>) -> Result<()> {
    let session = match cmd.command {
        CategoriesSubcommand::List => storage::open(api_url)?,
        _ => storage::require(api_url)?,
    };
    let result = dispatch(&session, cmd).await;
    storage::persist(&session)?;
    result
}

async fn dispatch(session: &CliSession, cmd: CategoriesCommand) -> Result<()> {
    let categories = session.client().categories();

    match cmd.command {
        CategoriesSubcommand::List => {
            let listing = categories
                .list()
                .await
                .context("Failed to list categories")?;
            output::lines(&listing.data, cmd.pretty)
        }
        CategoriesSubcommand::Create(fields) => {
            let created = categories
                .create(&fields.into())
                .await
                .context("Failed to create category")?;
            output::emit(&created.category, cmd.pretty)
        }
        CategoriesSubcommand::Update { id, fields } => {
            let updated = categories
                .update(id, &fields.into())
                .await
                .with_context(|| format!("Failed to update category {id}"))?;
            output::emit(&updated, cmd.pretty)
        }
        CategoriesSubcommand::Delete { id } => {
            categories
                .delete(id)
                .await
                .with_context(|| format!("Failed to delete category {id}"))?;
            output::success(&format!("Deleted category {id}"));
            Ok(())
        }
    }
}
