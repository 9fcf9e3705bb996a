//! CLI session: an API client plus the cookie jar it shares with the
//! transport, so both can be written to disk between invocations.

pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};

use storefront_core::ApiUrl;
use storefront_http::{ApiClient, AuthEndpoints, ClientConfig, ReqwestTransport, cookie_pairs};

#[derive(Debug)]
pub struct CliSession {
    client: ApiClient,
    transport: Arc<ReqwestTransport>,
}

impl CliSession {
    /// Open an unauthenticated session against `api_url`.
    pub fn new(api_url: ApiUrl, nested_login: bool) -> Result<Self> {
        let mut config = ClientConfig::new(api_url);
        if nested_login {
            config = config.with_endpoints(AuthEndpoints::nested());
        }

        let transport =
            Arc::new(ReqwestTransport::new(&config).context("Failed to build HTTP client")?);
        let client = ApiClient::with_transport(config, transport.clone());

        Ok(Self { client, transport })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn api_url(&self) -> &ApiUrl {
        &self.client.config().base_url
    }

    /// Cookies sent to every path of the API, as a `Cookie` header value.
    pub fn cookies(&self) -> Option<String> {
        self.transport.cookie_header(self.api_url().as_str())
    }

    /// Cookies only the refresh endpoint receives, such as a refresh cookie
    /// scoped to its path.
    pub fn refresh_cookies(&self) -> Option<String> {
        let all = self.transport.cookie_header(&self.refresh_url())?;
        let shared = self.cookies().unwrap_or_default();
        only_in(&all, &shared)
    }

    /// Put saved cookies back with the scope they were read from.
    pub fn restore_cookies(&self, shared: Option<&str>, refresh: Option<&str>) -> Result<()> {
        if let Some(header) = shared {
            self.transport
                .restore_cookies(self.api_url().as_str(), header)
                .context("Invalid stored cookies")?;
        }
        if let Some(header) = refresh {
            self.transport
                .restore_cookies(&self.refresh_url(), header)
                .context("Invalid stored refresh cookies")?;
        }
        Ok(())
    }

    fn refresh_url(&self) -> String {
        let config = self.client.config();
        config.base_url.endpoint(&config.endpoints.refresh)
    }
}

/// Pairs of the `all` header missing from `shared`, joined as a header value.
fn only_in(all: &str, shared: &str) -> Option<String> {
    let shared: Vec<&str> = cookie_pairs(shared).collect();
    let pairs: Vec<&str> = cookie_pairs(all)
        .filter(|pair| !shared.contains(pair))
        .collect();
    (!pairs.is_empty()).then(|| pairs.join("; "))
}
