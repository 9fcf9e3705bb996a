//! Core storefront types.
//!
//! These types validate at construction time so that an invalid base URL or
//! method never reaches the transport.

mod api_url;
mod method;

pub use api_url::ApiUrl;
pub use method::Method;
