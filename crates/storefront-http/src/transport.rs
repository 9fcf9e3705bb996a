//! reqwest-backed transport.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use tracing::{instrument, trace};

use storefront_core::error::{InvalidInputError, TransportError};
use storefront_core::{ApiResponse, Error, HttpRequest, Method, Result, Transport};

use crate::config::ClientConfig;

/// HTTP transport over a reqwest client with a shared cookie jar.
///
/// Every request goes through the jar, so the HttpOnly session cookie set
/// by the login endpoint is sent back to the refresh and logout endpoints.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    jar: Arc<Jar>,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let jar = Arc::new(Jar::default());

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .cookie_provider(jar.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| TransportError::Http {
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            jar,
            timeout: config.request_timeout,
        })
    }

    /// The `Cookie` header the jar would send to `url`.
    pub fn cookie_header(&self, url: &str) -> Option<String> {
        let url = reqwest::Url::parse(url).ok()?;
        self.jar
            .cookies(&url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Put cookies from a saved `Cookie` header back into the jar, scoped to
    /// `url`'s host and path. A `Cookie` header carries no attributes, so the
    /// caller picks the narrowest URL the cookies were read from.
    pub fn restore_cookies(&self, url: &str, header: &str) -> Result<()> {
        let url = reqwest::Url::parse(url).map_err(|e| InvalidInputError::Other {
            message: format!("invalid cookie URL '{url}': {e}"),
        })?;

        let path = url.path().to_string();
        for pair in cookie_pairs(header) {
            self.jar.add_cookie_str(&format!("{pair}; Path={path}"), &url);
        }

        Ok(())
    }

    fn map_error(&self, err: reqwest::Error) -> Error {
        let err = if err.is_timeout() {
            TransportError::Timeout {
                duration_ms: self.timeout.map(duration_ms).unwrap_or(0),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        };
        Error::Transport(err)
    }
}

/// Split a `Cookie` header into its `name=value` pairs.
pub fn cookie_pairs(header: &str) -> impl Iterator<Item = &str> {
    header.split(';').map(str::trim).filter(|p| !p.is_empty())
}

/// Milliseconds in `duration`, saturating at `u64::MAX`.
pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: &HttpRequest) -> Result<ApiResponse> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        trace!(status, "HTTP response");

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?;

        Ok(ApiResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::ApiUrl;

    fn transport() -> ReqwestTransport {
        let config = ClientConfig::new(ApiUrl::new("https://shop.example.com").unwrap());
        ReqwestTransport::new(&config).unwrap()
    }

    #[test]
    fn restored_cookies_are_sent_back() {
        let transport = transport();
        transport
            .restore_cookies("https://shop.example.com/", "theme=dark; lang=en")
            .unwrap();

        let header = transport
            .cookie_header("https://shop.example.com/api/logout")
            .unwrap();
        assert!(header.contains("theme=dark"));
        assert!(header.contains("lang=en"));
    }

    #[test]
    fn restored_cookies_keep_their_path() {
        let transport = transport();
        transport
            .restore_cookies(
                "https://shop.example.com/api/token/refresh",
                "refresh_token=abc",
            )
            .unwrap();

        let refresh = transport
            .cookie_header("https://shop.example.com/api/token/refresh")
            .unwrap();
        assert!(refresh.contains("refresh_token=abc"));
        assert!(
            transport
                .cookie_header("https://shop.example.com/api/products")
                .is_none()
        );
    }

    #[test]
    fn cookie_pairs_skip_blanks() {
        let pairs: Vec<_> = cookie_pairs(" a=1; ;b=2 ;").collect();
        assert_eq!(pairs, vec!["a=1", "b=2"]);
    }

    #[test]
    fn duration_ms_saturates() {
        assert_eq!(duration_ms(Duration::from_millis(1500)), 1500);
        assert_eq!(duration_ms(Duration::MAX), u64::MAX);
    }

    #[test]
    fn empty_jar_has_no_header() {
        assert!(
            transport()
                .cookie_header("https://shop.example.com/api/token/refresh")
                .is_none()
        );
    }
}
