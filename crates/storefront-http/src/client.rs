//! Authenticated API client.

use std::sync::Arc;

use futures_util::future::{BoxFuture, join_all};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{debug, info, instrument, trace, warn};

use storefront_core::error::{AuthError, InvalidInputError};
use storefront_core::{
    AccessToken, ApiResponse, Credentials, Error, HttpRequest, Method, Result, Role, Transport,
    UserIdentity,
};
use storefront_core::resources::Registration;

use crate::config::ClientConfig;
use crate::endpoints::{LoginRequest, RegisterResponse, TokenResponse};
use crate::request::{ApiRequest, RequestOptions};
use crate::state::{AuthStatus, ReplayAdmission, SessionState, Waiter};
use crate::transport::{ReqwestTransport, duration_ms};

/// Client for the storefront API.
///
/// Construct one per application session and hand out clones: clones share
/// the credential, the refresh state and the queue of waiting requests.
///
/// # Refresh behavior
///
/// When a request is answered with 401 and has not been retried yet, the
/// client refreshes the credential and retries it once. Requests that fail
/// while that refresh is running are queued instead of refreshing again, and
/// are replayed in arrival order with the new credential once it lands. If
/// the refresh fails, every queued request gets the same error.
///
/// The refresh runs on a spawned tokio task, so the client must be used
/// from within a tokio runtime.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    state: SessionState,
}

impl ApiClient {
    /// Create a client over a reqwest transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over any transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                config,
                transport,
                state: SessionState::new(),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    // ========================================================================
    // Request entry point
    // ========================================================================

    /// Issue a request with the current credential.
    ///
    /// Returns the response for any 2xx status. Other statuses come back as
    /// [`Error::Protocol`], except 401 which triggers the refresh-and-retry
    /// described on [`ApiClient`]. Transport failures are returned as-is and
    /// never retried.
    #[instrument(skip(self, body, options))]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse> {
        self.dispatch(ApiRequest::new(method, path, body, options))
            .await
    }

    /// Every dispatch, first attempt or replay, goes through here.
    fn dispatch(&self, request: ApiRequest) -> BoxFuture<'static, Result<ApiResponse>> {
        let client = self.clone();
        Box::pin(async move { client.dispatch_once(request).await })
    }

    async fn dispatch_once(self, mut request: ApiRequest) -> Result<ApiResponse> {
        let (token, generation) = self.inner.state.snapshot();
        request.sent_with = generation;

        let http = self.prepare(&request, token.as_ref())?;
        debug!(method = %request.method, path = %request.path, retried = request.retried, "Dispatching request");

        let response = self.inner.transport.send(&http).await?;
        trace!(status = response.status, "Response received");

        if response.status != 401 {
            return if response.is_success() {
                Ok(response)
            } else {
                Err(Error::Protocol(response.to_protocol_error()))
            };
        }

        if request.retried {
            warn!(method = %request.method, path = %request.path, "Unauthorized after refresh");
            return Err(AuthError::Unauthorized {
                method: request.method.to_string(),
                path: request.path,
            }
            .into());
        }

        request.retried = true;
        match self.inner.state.admit_replay(request) {
            ReplayAdmission::Retry(request) => {
                debug!("Credential changed since dispatch, retrying");
                self.dispatch(request).await
            }
            ReplayAdmission::Wait(ticket) => {
                if ticket.opened {
                    self.start_wave();
                } else {
                    debug!("Refresh in flight, request queued");
                }
                ticket
                    .outcome
                    .await
                    .unwrap_or_else(|_| Err(AuthError::RefreshAbandoned.into()))
            }
        }
    }

    fn prepare(&self, request: &ApiRequest, token: Option<&AccessToken>) -> Result<HttpRequest> {
        let url = self.endpoint_url(&request.path, &request.options.query)?;

        let mut http = HttpRequest::new(request.method, url)
            .with_header("Accept", "application/json")
            .with_header("Content-Type", "application/json");

        for (name, value) in &request.options.headers {
            if token.is_some() && name.eq_ignore_ascii_case("authorization") {
                continue;
            }
            http = http.with_header(name.as_str(), value.as_str());
        }
        if let Some(token) = token {
            http = http.with_header("Authorization", token.bearer());
        }
        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body).map_err(|e| InvalidInputError::Other {
                message: format!("unserializable body: {e}"),
            })?;
            http = http.with_body(bytes);
        }

        Ok(http)
    }

    fn endpoint_url(&self, path: &str, query: &[(String, String)]) -> Result<String> {
        let url = self.inner.config.base_url.endpoint(path);
        if query.is_empty() {
            return Ok(url);
        }

        let mut url = reqwest::Url::parse(&url).map_err(|e| InvalidInputError::Other {
            message: format!("invalid path '{path}': {e}"),
        })?;
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        Ok(url.into())
    }

    // ========================================================================
    // Refresh wave
    // ========================================================================

    fn start_wave(&self) {
        let client = self.clone();
        tokio::spawn(async move { client.run_wave().await });
    }

    #[instrument(skip(self))]
    async fn run_wave(self) {
        let mut guard = WaveGuard {
            state: &self.inner.state,
            settled: false,
        };

        info!("Refreshing credential");
        let outcome = self.refresh_credential().await;

        match &outcome {
            Ok(()) => debug!("Credential refreshed"),
            Err(err) => {
                warn!(error = %err, "Refresh failed");
                if matches!(err, Error::Auth(AuthError::RefreshRejected { .. }))
                    && !self.inner.state.expire_refreshed()
                {
                    debug!("Session replaced during refresh, not expiring it");
                }
            }
        }

        while let Some(batch) = self.inner.state.take_batch() {
            match &outcome {
                Ok(()) => self.replay(batch),
                Err(err) => reject(batch, err),
            }
        }
        guard.settled = true;
    }

    /// Start the replays of one batch. They are driven together on a single
    /// task, and `join_all` polls them in order on its first poll, so each
    /// replay's transport call starts before the next one's.
    fn replay(&self, batch: Vec<Waiter>) {
        debug!(count = batch.len(), "Replaying queued requests");

        let replays: Vec<_> = batch
            .into_iter()
            .map(|waiter| {
                let client = self.clone();
                async move {
                    match waiter {
                        Waiter::Replay { request, reply } => {
                            let result = client.dispatch(request).await;
                            let _ = reply.send(result);
                        }
                        Waiter::Refresh { reply } => {
                            let _ = reply.send(Ok(()));
                        }
                    }
                }
            })
            .collect();

        tokio::spawn(join_all(replays));
    }

    /// One call to the refresh endpoint, bounded by the configured timeout.
    ///
    /// Every failure comes back as an [`Error::Auth`], so waiters see an
    /// authorization failure whatever went wrong with the refresh itself.
    async fn refresh_credential(&self) -> Result<()> {
        let (token, identity) = self.request_refresh().await.map_err(|err| match err {
            Error::Auth(_) => err,
            other => AuthError::RefreshFailed {
                source: Box::new(other),
            }
            .into(),
        })?;

        if self.inner.state.store_refreshed(token, identity) {
            Ok(())
        } else {
            Err(AuthError::RefreshSuperseded.into())
        }
    }

    async fn request_refresh(&self) -> Result<(AccessToken, Option<UserIdentity>)> {
        let config = &self.inner.config;
        let request = HttpRequest::new(
            Method::Post,
            config.base_url.endpoint(&config.endpoints.refresh),
        )
        .with_header("Accept", "application/json");

        let call = self.inner.transport.send(&request);
        let response = match config.refresh_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                AuthError::RefreshTimedOut {
                    duration_ms: duration_ms(limit),
                }
            })??,
            None => call.await?,
        };

        if !response.is_success() {
            let err = response.to_protocol_error();
            return Err(AuthError::RefreshRejected {
                status: err.status,
                message: err.message,
            }
            .into());
        }

        let body: TokenResponse = response.json()?;
        let identity = body.identity();
        Ok((AccessToken::new(body.token), identity))
    }

    /// Refresh the credential now.
    ///
    /// Joins a refresh that is already running instead of starting another.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let ticket = self.inner.state.admit_refresh();
        if ticket.opened {
            self.start_wave();
        }
        ticket
            .outcome
            .await
            .unwrap_or_else(|_| Err(AuthError::RefreshAbandoned.into()))
    }

    // ========================================================================
    // Session endpoints
    // ========================================================================

    /// Log in and store the returned credential.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<UserIdentity> {
        info!("Logging in");

        let config = &self.inner.config;
        let body = serde_json::to_vec(&LoginRequest {
            username: credentials.username(),
            password: credentials.password(),
        })
        .map_err(|e| InvalidInputError::Other {
            message: e.to_string(),
        })?;
        let request = HttpRequest::new(Method::Post, config.base_url.endpoint(&config.endpoints.login))
            .with_header("Accept", "application/json")
            .with_header("Content-Type", "application/json")
            .with_body(body);

        let response = self.inner.transport.send(&request).await?;
        if response.status == 401 {
            return Err(AuthError::InvalidCredentials.into());
        }
        if !response.is_success() {
            return Err(Error::Protocol(response.to_protocol_error()));
        }

        let body: TokenResponse = response.json()?;
        let mut identity = body.identity().unwrap_or_default();
        if identity.username.is_none() {
            identity.username = Some(credentials.username().to_string());
        }

        self.inner
            .state
            .store(AccessToken::new(body.token), Some(identity.clone()));
        debug!(role = ?identity.role(), "Logged in");

        Ok(identity)
    }

    /// Create an account. Returns the identity when the server also opened
    /// a session.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<Option<UserIdentity>> {
        info!("Registering account");

        let config = &self.inner.config;
        let body = serde_json::to_vec(registration).map_err(|e| InvalidInputError::Other {
            message: e.to_string(),
        })?;
        let request = HttpRequest::new(
            Method::Post,
            config.base_url.endpoint(&config.endpoints.register),
        )
        .with_header("Accept", "application/json")
        .with_header("Content-Type", "application/json")
        .with_body(body);

        let response = self.inner.transport.send(&request).await?;
        if !response.is_success() {
            return Err(Error::Protocol(response.to_protocol_error()));
        }

        let body: RegisterResponse = response.json()?;
        let Some(token) = body.token else {
            return Ok(None);
        };

        let mut identity: UserIdentity = body.user.map(Into::into).unwrap_or_default();
        if identity.email.is_none() {
            identity.email = Some(registration.email.clone());
        }
        self.inner
            .state
            .store(AccessToken::new(token), Some(identity.clone()));

        Ok(Some(identity))
    }

    /// Invalidate the server-side session and drop the local credential.
    ///
    /// The local credential is dropped even when the server call fails; the
    /// server's answer is still returned.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        info!("Logging out");

        let config = &self.inner.config;
        let (token, _) = self.inner.state.snapshot();
        let mut request = HttpRequest::new(
            Method::Post,
            config.base_url.endpoint(&config.endpoints.logout),
        )
        .with_header("Accept", "application/json");
        if let Some(token) = token {
            request = request.with_header("Authorization", token.bearer());
        }

        let result = self.inner.transport.send(&request).await;
        self.inner.state.clear(AuthStatus::SignedOut);

        let response = result?;
        if response.is_success() {
            Ok(())
        } else {
            Err(Error::Protocol(response.to_protocol_error()))
        }
    }

    // ========================================================================
    // Observation
    // ========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.credential().is_some()
    }

    pub fn identity(&self) -> Option<UserIdentity> {
        self.inner.state.credential().and_then(|c| c.identity)
    }

    pub fn role(&self) -> Option<Role> {
        self.identity().map(|i| i.role())
    }

    /// Whether a refresh call is currently running.
    pub fn refresh_in_flight(&self) -> bool {
        self.inner.state.in_flight()
    }

    /// Number of requests and refresh calls waiting on the running refresh.
    pub fn pending_requests(&self) -> usize {
        self.inner.state.pending()
    }

    pub fn status(&self) -> AuthStatus {
        self.inner.state.status()
    }

    /// Watch authentication status changes, e.g. to send the user back to a
    /// login screen on [`AuthStatus::Expired`].
    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.inner.state.subscribe()
    }

    /// Export the current access token for persistence.
    ///
    /// # Security
    ///
    /// Handle the returned token securely. It grants access to the account.
    pub fn export_access_token(&self) -> Option<AccessToken> {
        self.inner.state.credential().map(|c| c.token)
    }

    /// Install a previously exported credential.
    pub fn restore(&self, token: AccessToken, identity: Option<UserIdentity>) {
        self.inner.state.store(token, identity);
    }

    // ========================================================================
    // Typed helpers
    // ========================================================================

    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.send_json::<(), R>(Method::Get, path, None, RequestOptions::default())
            .await
    }

    pub async fn get_json_with<R: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<R> {
        self.send_json::<(), R>(Method::Get, path, None, options)
            .await
    }

    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(Method::Post, path, Some(body), RequestOptions::default())
            .await
    }

    pub async fn put_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(Method::Put, path, Some(body), RequestOptions::default())
            .await
    }

    pub async fn patch_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_json(Method::Patch, path, Some(body), RequestOptions::default())
            .await
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.send_json::<(), R>(Method::Delete, path, None, RequestOptions::default())
            .await
    }

    async fn send_json<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| InvalidInputError::Other {
                message: format!("unserializable body: {e}"),
            })?;

        self.request(method, path, body, options).await?.json()
    }
}

/// Closes the wave if its task is dropped before settling, so waiters see
/// [`AuthError::RefreshAbandoned`] instead of hanging.
struct WaveGuard<'a> {
    state: &'a SessionState,
    settled: bool,
}

impl Drop for WaveGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.state.abandon();
        }
    }
}

fn reject(batch: Vec<Waiter>, err: &Error) {
    debug!(count = batch.len(), "Rejecting queued requests");
    for waiter in batch {
        match waiter {
            Waiter::Replay { reply, .. } => {
                let _ = reply.send(Err(err.clone()));
            }
            Waiter::Refresh { reply } => {
                let _ = reply.send(Err(err.clone()));
            }
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.config.base_url)
            .field("state", &self.inner.state)
            .finish()
    }
}
