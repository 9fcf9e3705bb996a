//! Product records.

use serde::{Deserialize, Serialize};

use super::Category;

/// A product as returned by `GET /api/products/{id}` and list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

/// Product images come back either as bare URLs or as image records,
/// depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductImage {
    Url(String),
    Detailed {
        #[serde(default)]
        id: Option<u64>,
        url: String,
        #[serde(default, rename = "altText")]
        alt_text: Option<String>,
    },
}

impl ProductImage {
    pub fn url(&self) -> &str {
        match self {
            ProductImage::Url(url) => url,
            ProductImage::Detailed { url, .. } => url,
        }
    }
}

/// Paged listing envelope: `{status, total?, page?, data}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u64>,
    pub data: Vec<T>,
}

/// Search envelope: `{status, results}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults<T> {
    #[serde(default)]
    pub status: Option<String>,
    pub results: Vec<T>,
}

/// A category reference in a create request: numeric id or slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryKey {
    Id(u64),
    Slug(String),
}

/// One entry of the batch body for `POST /api/products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub categories: Vec<CategoryKey>,
    pub images: Vec<String>,
}

/// `{id}` returned per created product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub id: u64,
}

/// Image entry of a full product update; omit `id` for new images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImageInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub filename: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body for `PATCH /api/products/{id}` (full edit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub sku: String,
    pub price: f64,
    pub stock: i64,
    pub images: Vec<ProductImageInput>,
}

/// Body for the quick-edit `PATCH /api/products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub id: u64,
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub stock: i64,
}

/// Body and response of `PATCH /api/products/category/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAssignment {
    pub id: u64,
    pub categories: Vec<Category>,
}
