//! Plain data-transfer records for the storefront's REST resources.
//!
//! Field names follow the API's JSON exactly; the API mixes camelCase and
//! snake_case between resources, so each record carries its own renames.

mod category;
mod order;
mod product;
mod user;

pub use category::{Category, CategoryCreated, CategoryInput, StatusMessage};
pub use order::{ItemImage, OrderItem, OrderLine, OrderResponse, QuantityUpdate, UserOrder};
pub use product::{
    CategoryAssignment, CategoryKey, Created, Listing, NewProduct, Product, ProductImage,
    ProductImageInput, ProductPatch, ProductUpdate, SearchResults,
};
pub use user::{Registration, UserRecord};
