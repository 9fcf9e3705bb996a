//! `/api/categories` endpoints.

use tracing::instrument;

use storefront_core::Result;
use storefront_core::resources::{Category, CategoryCreated, CategoryInput, Listing, StatusMessage};

use crate::client::ApiClient;

#[derive(Debug, Clone, Copy)]
pub struct Categories<'a> {
    client: &'a ApiClient,
}

impl<'a> Categories<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Listing<Category>> {
        self.client.get_json("/api/categories").await
    }

    #[instrument(skip(self, input), fields(slug = %input.slug))]
    pub async fn create(&self, input: &CategoryInput) -> Result<CategoryCreated> {
        self.client.post_json("/api/categories", input).await
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: u64, input: &CategoryInput) -> Result<serde_json::Value> {
        self.client
            .patch_json(&format!("/api/categories/{id}"), input)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<StatusMessage> {
        self.client.delete(&format!("/api/categories/{id}")).await
    }
}
