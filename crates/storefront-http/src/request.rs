//! Outbound request model.

use serde_json::Value;
use storefront_core::Method;

/// Per-request options: extra headers and query parameters.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// One logical request. It survives a refresh wave intact and is prepared
/// again, with whatever credential is current, on every dispatch.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub options: RequestOptions,
    /// Set once the request has been through one refresh-and-retry.
    pub retried: bool,
    /// Credential generation used for the latest dispatch.
    pub sent_with: u64,
}

impl ApiRequest {
    pub fn new(method: Method, path: &str, body: Option<Value>, options: RequestOptions) -> Self {
        Self {
            method,
            path: path.to_string(),
            body,
            options,
            retried: false,
            sent_with: 0,
        }
    }
}
