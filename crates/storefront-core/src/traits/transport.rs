//! Transport trait.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::Result;
use crate::http::{ApiResponse, HttpRequest};

/// Something that can put a prepared request on the wire.
///
/// Implementations return `Ok` for every response that carried a status
/// code, including 401 and 5xx; status handling belongs to the caller.
/// `Err` is reserved for failures where no status was obtained
/// (connection, DNS, TLS, timeout).
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Send the request and return the raw response.
    async fn send(&self, request: &HttpRequest) -> Result<ApiResponse>;
}
