//! `/api/orders` endpoints.

use tracing::instrument;

use storefront_core::Result;
use storefront_core::resources::{OrderLine, OrderResponse, QuantityUpdate, UserOrder};

use crate::client::ApiClient;

#[derive(Debug, Clone, Copy)]
pub struct Orders<'a> {
    client: &'a ApiClient,
}

impl<'a> Orders<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Add a product line to the user's open order, creating the order if
    /// there is none.
    #[instrument(skip(self))]
    pub async fn create(&self, line: OrderLine) -> Result<OrderResponse> {
        self.client.post_json("/api/orders", &line).await
    }

    #[instrument(skip(self))]
    pub async fn for_user(&self, user_id: u64) -> Result<Vec<UserOrder>> {
        self.client
            .get_json(&format!("/api/orders/user/{user_id}"))
            .await
    }

    #[instrument(skip(self))]
    pub async fn update_item_quantity(
        &self,
        item_id: u64,
        quantity: i64,
    ) -> Result<serde_json::Value> {
        self.client
            .patch_json(
                &format!("/api/orders/items/{item_id}"),
                &QuantityUpdate { quantity },
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, item_id: u64) -> Result<serde_json::Value> {
        self.client
            .delete(&format!("/api/orders/items/{item_id}"))
            .await
    }

    /// Delete the whole order.
    #[instrument(skip(self))]
    pub async fn clear(&self, order_id: u64) -> Result<serde_json::Value> {
        self.client
            .delete(&format!("/api/orders/{order_id}"))
            .await
    }
}
