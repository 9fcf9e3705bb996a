//! `/api/products` endpoints.

use tracing::instrument;

use storefront_core::Result;
use storefront_core::resources::{
    Category, CategoryAssignment, Created, Listing, NewProduct, Product, ProductPatch,
    ProductUpdate, SearchResults,
};

use crate::client::ApiClient;
use crate::request::RequestOptions;

/// Product catalogue operations.
#[derive(Debug, Clone, Copy)]
pub struct Products<'a> {
    client: &'a ApiClient,
}

impl<'a> Products<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List products, optionally capped at `limit` entries.
    #[instrument(skip(self))]
    pub async fn list(&self, limit: Option<u32>) -> Result<Listing<Product>> {
        let mut options = RequestOptions::new();
        if let Some(limit) = limit {
            options = options.query("limit", limit.to_string());
        }
        self.client.get_json_with("/api/products", options).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: u64) -> Result<Product> {
        self.client.get_json(&format!("/api/products/{id}")).await
    }

    /// Full-text search over the catalogue.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Product>> {
        let options = RequestOptions::new().query("q", query);
        let found: SearchResults<Product> = self
            .client
            .get_json_with("/api/products/search", options)
            .await?;
        Ok(found.results)
    }

    /// Products filed under the category with the given slug.
    #[instrument(skip(self))]
    pub async fn by_category(&self, slug: &str) -> Result<Listing<Product>> {
        self.client
            .get_json(&format!("/api/categories/{slug}/products"))
            .await
    }

    /// Create a batch of products. Returns one id per created product, in
    /// input order.
    #[instrument(skip(self, batch), fields(count = batch.len()))]
    pub async fn create(&self, batch: &[NewProduct]) -> Result<Vec<Created>> {
        self.client.post_json("/api/products", batch).await
    }

    /// Full edit, images included.
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: u64, update: &ProductUpdate) -> Result<Vec<Created>> {
        self.client
            .patch_json(&format!("/api/products/{id}"), update)
            .await
    }

    /// Quick edit of name, SKU, price and stock.
    #[instrument(skip(self, patch))]
    pub async fn patch(&self, id: u64, patch: &ProductPatch) -> Result<serde_json::Value> {
        self.client
            .patch_json(&format!("/api/products/{id}"), patch)
            .await
    }

    /// Replace the product's category set.
    #[instrument(skip(self, categories))]
    pub async fn set_categories(
        &self,
        id: u64,
        categories: Vec<Category>,
    ) -> Result<CategoryAssignment> {
        let body = CategoryAssignment { id, categories };
        self.client
            .patch_json(&format!("/api/products/category/{id}"), &body)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<serde_json::Value> {
        self.client.delete(&format!("/api/products/{id}")).await
    }
}
