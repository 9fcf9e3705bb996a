//! Session storage for persisting login state.
//!
//! The session lives in `session.json` under the platform data directory
//! (`$XDG_DATA_HOME/storefront` on Linux).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use storefront_core::{AccessToken, ApiUrl, UserIdentity};
use storefront_http::AuthStatus;

use super::CliSession;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored session data.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    api_url: String,
    access_token: String,
    #[serde(default)]
    identity: Option<UserIdentity>,
    /// `Cookie` header sent to every API path.
    #[serde(default)]
    cookies: Option<String>,
    /// Cookies scoped to the refresh endpoint alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_cookies: Option<String>,
}

/// Get the session file path.
fn session_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "storefront").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}

/// Save a session to disk. Sessions without a credential are not saved.
pub fn save_session(session: &CliSession) -> Result<()> {
    let client = session.client();
    let Some(token) = client.export_access_token() else {
        bail!("Cannot save a session without a credential");
    };

    let stored = StoredSession {
        api_url: session.api_url().to_string(),
        access_token: token.as_str().to_string(),
        identity: client.identity(),
        cookies: session.cookies(),
        refresh_cookies: session.refresh_cookies(),
    };

    let path = session_path()?;
    let json = serde_json::to_string_pretty(&stored)?;
    fs::write(&path, &json).context("Failed to write session file")?;

    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    debug!(path = %path.display(), "Session saved");
    Ok(())
}

/// Load the stored session, if any.
pub fn load_session() -> Result<Option<CliSession>> {
    let path = session_path()?;
    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read session file")?;
    let stored: StoredSession = serde_json::from_str(&json).context("Invalid session file")?;

    let api_url = ApiUrl::new(&stored.api_url).context("Invalid API URL in session")?;
    let session = CliSession::new(api_url, false)?;
    session.restore_cookies(stored.cookies.as_deref(), stored.refresh_cookies.as_deref())?;
    session
        .client()
        .restore(AccessToken::new(stored.access_token), stored.identity);

    Ok(Some(session))
}

/// Clear the stored session.
pub fn clear_session() -> Result<()> {
    let path = session_path()?;
    if path.exists() {
        fs::remove_file(&path).context("Failed to remove session file")?;
    }
    Ok(())
}

/// The stored session when it targets `api_url` (or no URL was given),
/// otherwise an anonymous session against `api_url`.
pub fn open(api_url: Option<&str>) -> Result<CliSession> {
    let stored = load_session()?;

    match (api_url, stored) {
        (None, Some(session)) => Ok(session),
        (Some(url), Some(session)) if same_api(url, session.api_url()) => Ok(session),
        (Some(url), _) => {
            let api_url = ApiUrl::new(url).context("Invalid API URL")?;
            CliSession::new(api_url, false)
        }
        (None, None) => {
            bail!("No API URL. Pass --api-url, set STOREFRONT_API_URL, or run 'storefront auth login'.")
        }
    }
}

/// Like [`open`], but the session must hold a credential.
pub fn require(api_url: Option<&str>) -> Result<CliSession> {
    let session = open(api_url)?;
    if !session.client().is_authenticated() {
        bail!("No active session. Run 'storefront auth login' first.");
    }
    Ok(session)
}

/// Write back whatever the command left behind: a refreshed credential is
/// saved, a session the server expired is removed.
pub fn persist(session: &CliSession) -> Result<()> {
    let client = session.client();
    if client.is_authenticated() {
        save_session(session)
    } else if client.status() == AuthStatus::Expired {
        debug!("Session expired, removing it");
        clear_session()
    } else {
        Ok(())
    }
}

fn same_api(url: &str, api_url: &ApiUrl) -> bool {
    ApiUrl::new(url).is_ok_and(|u| u.as_str() == api_url.as_str())
}
