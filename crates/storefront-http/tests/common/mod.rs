//! In-memory transport for deterministic refresh-wave tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;

use storefront_core::error::TransportError;
use storefront_core::{AccessToken, ApiResponse, ApiUrl, HttpRequest, Result, Transport};
use storefront_http::{ApiClient, ClientConfig};

pub const BASE: &str = "http://127.0.0.1:8000";
pub const REFRESH_PATH: &str = "/api/token/refresh";
pub const LOGIN_PATH: &str = "/api/login_check";
pub const LOGOUT_PATH: &str = "/api/logout";

/// How the scripted server answers the refresh endpoint.
#[derive(Debug, Clone)]
pub enum RefreshScript {
    /// Issue `fresh-<n>` and accept it from now on.
    Issue,
    /// Answer with this status.
    Reject(u16),
    /// Fail without a status.
    Drop,
    /// Answer 200 with a body that is not a token.
    Garbled,
}

/// A fake API server.
///
/// Requests are logged on their first poll, before anything is awaited, so
/// the log reflects the order in which transport calls were initiated.
///
/// - `/api/token/refresh` follows the [`RefreshScript`], optionally parked
///   until [`ScriptedTransport::release_refresh`].
/// - `/api/login_check` issues and accepts `login-token`.
/// - `/api/logout` answers 204.
/// - Paths under `/down` fail at the network level.
/// - Paths under `/missing` answer 404.
/// - Paths under `/locked` answer 401 whatever the credential.
/// - Everything else answers 200 for the accepted token and 401 otherwise.
#[derive(Debug)]
pub struct ScriptedTransport {
    log: Mutex<Vec<HttpRequest>>,
    accepted: Mutex<Option<String>>,
    issued: Mutex<u32>,
    script: Mutex<RefreshScript>,
    hold: AtomicBool,
    gate: Notify,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            log: Mutex::new(Vec::new()),
            accepted: Mutex::new(None),
            issued: Mutex::new(0),
            script: Mutex::new(RefreshScript::Issue),
            hold: AtomicBool::new(false),
            gate: Notify::new(),
        })
    }

    pub fn script(&self, script: RefreshScript) {
        *self.script.lock().unwrap() = script;
    }

    /// Park refresh calls until released.
    pub fn hold_refresh(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    pub fn release_refresh(&self) {
        self.hold.store(false, Ordering::SeqCst);
        self.gate.notify_one();
    }

    /// Stop accepting the current token.
    pub fn revoke(&self) {
        *self.accepted.lock().unwrap() = None;
    }

    pub fn accept(&self, token: &str) {
        *self.accepted.lock().unwrap() = Some(token.to_string());
    }

    pub fn log(&self) -> Vec<HttpRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn refresh_calls(&self) -> usize {
        self.log()
            .iter()
            .filter(|r| r.url.ends_with(REFRESH_PATH))
            .count()
    }

    /// Paths and bearer tokens of the non-refresh requests, in initiation order.
    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.log()
            .iter()
            .filter(|r| !r.url.ends_with(REFRESH_PATH))
            .map(|r| {
                (
                    r.url.trim_start_matches(BASE).to_string(),
                    r.header("authorization").map(str::to_string),
                )
            })
            .collect()
    }

    async fn refresh(&self) -> Result<ApiResponse> {
        if self.hold.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }

        let script = self.script.lock().unwrap().clone();
        match script {
            RefreshScript::Issue => {
                let token = {
                    let mut issued = self.issued.lock().unwrap();
                    *issued += 1;
                    format!("fresh-{issued}")
                };
                self.accept(&token);
                Ok(ApiResponse::json_body(200, &json!({ "token": token })))
            }
            RefreshScript::Reject(status) => Ok(ApiResponse::json_body(
                status,
                &json!({ "code": status, "message": "Invalid refresh token" }),
            )),
            RefreshScript::Drop => Err(TransportError::Connection {
                message: "connection reset".to_string(),
            }
            .into()),
            RefreshScript::Garbled => Ok(ApiResponse::new(200, "<html>maintenance</html>")),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> Result<ApiResponse> {
        self.log.lock().unwrap().push(request.clone());

        let path = request.url.trim_start_matches(BASE).to_string();
        if path == REFRESH_PATH {
            return self.refresh().await;
        }
        if path == LOGIN_PATH {
            self.accept("login-token");
            return Ok(ApiResponse::json_body(200, &json!({ "token": "login-token" })));
        }
        if path == LOGOUT_PATH {
            return Ok(ApiResponse::new(204, Vec::new()));
        }
        if path.starts_with("/down") {
            return Err(TransportError::Connection {
                message: "connection refused".to_string(),
            }
            .into());
        }
        if path.starts_with("/missing") {
            return Ok(ApiResponse::json_body(
                404,
                &json!({ "code": 404, "message": "Not found" }),
            ));
        }

        let accepted = self.accepted.lock().unwrap().clone();
        let authorized = match (request.header("authorization"), accepted) {
            (Some(sent), Some(token)) => sent == format!("Bearer {token}"),
            _ => false,
        };
        if path.starts_with("/locked") || !authorized {
            return Ok(ApiResponse::json_body(
                401,
                &json!({ "code": 401, "message": "Expired JWT Token" }),
            ));
        }

        Ok(ApiResponse::json_body(200, &json!({ "path": path })))
    }
}

/// Client over the scripted transport holding the token `stale`, which the
/// server does not accept.
pub fn stale_client(transport: &Arc<ScriptedTransport>) -> ApiClient {
    stale_client_with(transport, ClientConfig::new(ApiUrl::new(BASE).unwrap()))
}

pub fn stale_client_with(transport: &Arc<ScriptedTransport>, config: ClientConfig) -> ApiClient {
    let client = ApiClient::with_transport(config, transport.clone());
    client.restore(AccessToken::new("stale"), None);
    client
}

/// Yield until `pending` requests are parked on the open wave.
pub async fn wait_for_pending(client: &ApiClient, pending: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while client.pending_requests() < pending {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("requests never queued");
}
