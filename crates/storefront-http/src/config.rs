//! Client configuration.

use std::time::Duration;

use storefront_core::ApiUrl;

/// Default bound on a single refresh call.
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(30);

/// Default transport timeout for ordinary requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Paths of the session endpoints, relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEndpoints {
    pub login: String,
    pub refresh: String,
    pub logout: String,
    pub register: String,
}

impl AuthEndpoints {
    /// Layout used by deployments that mount the login check under `/api/auth`.
    pub fn nested() -> Self {
        Self {
            login: "/api/auth/login_check".to_string(),
            ..Self::default()
        }
    }
}

impl Default for AuthEndpoints {
    fn default() -> Self {
        Self {
            login: "/api/login_check".to_string(),
            refresh: "/api/token/refresh".to_string(),
            logout: "/api/logout".to_string(),
            register: "/api/register".to_string(),
        }
    }
}

/// Configuration for an [`ApiClient`](crate::ApiClient).
///
/// ```
/// use std::time::Duration;
/// use storefront_core::ApiUrl;
/// use storefront_http::{AuthEndpoints, ClientConfig};
///
/// let config = ClientConfig::new(ApiUrl::new("https://shop.example.com").unwrap())
///     .with_endpoints(AuthEndpoints::nested())
///     .with_refresh_timeout(Some(Duration::from_secs(5)));
/// assert_eq!(config.endpoints.login, "/api/auth/login_check");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: ApiUrl,
    pub endpoints: AuthEndpoints,
    /// Upper bound on one refresh call; `None` waits indefinitely.
    pub refresh_timeout: Option<Duration>,
    /// Transport timeout for every request; `None` disables it.
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: ApiUrl) -> Self {
        Self {
            base_url,
            endpoints: AuthEndpoints::default(),
            refresh_timeout: Some(DEFAULT_REFRESH_TIMEOUT),
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            user_agent: concat!("storefront/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: AuthEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_refresh_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
