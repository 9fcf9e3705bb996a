//! Order subcommands. Orders belong to the logged-in user.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use storefront_core::resources::OrderLine;

use crate::output;
use crate::session::{CliSession, storage};

#[derive(Args, Debug)]
pub struct OrdersCommand {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: OrdersSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum OrdersSubcommand {
    /// List your orders
    Mine,

    /// Add a product to your open order
    Create {
        #[arg(long)]
        product: u64,

        #[arg(long, default_value_t = 1)]
        quantity: i64,
    },

    /// Change the quantity of an order item
    SetQuantity { item: u64, quantity: i64 },

    /// Remove an item from its order
    RemoveItem { item: u64 },

    /// Delete a whole order
    Clear { order: u64 },
}

pub async fn handle(cmd: OrdersCommand, api_url: Option<&str>) -> Result<()> {
    let session = storage::require(api_url)?;
    let result = dispatch(&session, cmd).await;
    storage::persist(&session)?;
    result
}

async fn dispatch(session: &CliSession, cmd: OrdersCommand) -> Result<()> {
    let orders = session.client().orders();

    match cmd.command {
        OrdersSubcommand::Mine => {
            let user_id = user_id(session)?;
            let mine = orders
                .for_user(user_id)
                .await
                .context("Failed to list orders")?;
            output::lines(&mine, cmd.pretty)
        }
        OrdersSubcommand::Create { product, quantity } => {
            let line = OrderLine {
                user_id: user_id(session)?,
                product_id: product,
                quantity,
            };
            let order = orders.create(line).await.context("Failed to add to order")?;
            output::emit(&order, cmd.pretty)
        }
        OrdersSubcommand::SetQuantity { item, quantity } => {
            orders
                .update_item_quantity(item, quantity)
                .await
                .with_context(|| format!("Failed to update item {item}"))?;
            output::success(&format!("Item {item} set to {quantity}"));
            Ok(())
        }
        OrdersSubcommand::RemoveItem { item } => {
            orders
                .delete_item(item)
                .await
                .with_context(|| format!("Failed to remove item {item}"))?;
            output::success(&format!("Removed item {item}"));
            Ok(())
        }
        OrdersSubcommand::Clear { order } => {
            orders
                .clear(order)
                .await
                .with_context(|| format!("Failed to clear order {order}"))?;
            output::success(&format!("Cleared order {order}"));
            Ok(())
        }
    }
}

fn user_id(session: &CliSession) -> Result<u64> {
    session
        .client()
        .identity()
        .and_then(|identity| identity.id)
        .context("The session does not carry a user id. Log in again.")
}
