//! storefront-core - Core types and traits for the storefront API client.
//!
//! This crate holds everything that does not touch the network directly:
//! the error taxonomy, credential and identity types, the validated API
//! base URL, the [`Transport`] seam and the plain REST resource records.

pub mod credentials;
pub mod error;
pub mod http;
pub mod identity;
pub mod resources;
pub mod tokens;
pub mod traits;
pub mod types;

pub use credentials::Credentials;
pub use error::Error;
pub use http::{ApiResponse, HttpRequest};
pub use identity::{Role, UserIdentity};
pub use tokens::AccessToken;
pub use traits::Transport;
pub use types::{ApiUrl, Method};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
