//! storefront-http - Authenticated HTTP client for the storefront API.
//!
//! [`ApiClient`] attaches the current bearer token to every request and
//! recovers from a 401 by refreshing the credential once per failure wave,
//! then replaying every request that failed with the stale token.
//!
//! # Example
//!
//! ```no_run
//! use storefront_core::{ApiUrl, Credentials, Method};
//! use storefront_http::{ApiClient, ClientConfig, RequestOptions};
//!
//! # async fn example() -> Result<(), storefront_core::Error> {
//! let config = ClientConfig::new(ApiUrl::new("https://shop.example.com")?);
//! let client = ApiClient::new(config)?;
//!
//! client.login(&Credentials::new("alice@example.com", "secret")).await?;
//! let response = client
//!     .request(Method::Get, "/api/categories", None, RequestOptions::default())
//!     .await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod config;
mod endpoints;
mod request;
mod state;
mod transport;

pub use api::{Categories, Orders, Products, Users};
pub use client::ApiClient;
pub use config::{AuthEndpoints, ClientConfig};
pub use request::RequestOptions;
pub use state::AuthStatus;
pub use transport::{ReqwestTransport, cookie_pairs};
