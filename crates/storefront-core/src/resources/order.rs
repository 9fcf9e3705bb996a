//! Order records.

use serde::{Deserialize, Serialize};

/// Body for `POST /api/orders`: adds a product line to the user's open order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub user_id: u64,
    pub product_id: u64,
    pub quantity: i64,
}

/// Image attached to an order item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub item_id: u64,
    pub product_id: u64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
    #[serde(default)]
    pub images: Vec<ItemImage>,
}

/// Response of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order_id: u64,
    pub customer_email: String,
    pub status: String,
    pub total_amount: f64,
    pub total_quantity: i64,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// One entry of `GET /api/orders/user/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserOrder {
    pub order_id: u64,
    pub status: String,
    pub customer_email: String,
    pub total_amount: f64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Body for `PATCH /api/orders/items/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityUpdate {
    pub quantity: i64,
}
