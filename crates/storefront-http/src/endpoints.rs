//! Request/response types of the session endpoints.

use serde::{Deserialize, Serialize};

use storefront_core::UserIdentity;

/// Request body for `login_check`.
#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response from `login_check` and `token/refresh`.
///
/// Deployments disagree on the key (`token` vs `accessToken`) and on
/// whether roles come at the top level or inside `user`.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(alias = "accessToken")]
    pub token: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub user: Option<UserIdentity>,
}

impl TokenResponse {
    /// Identity carried by the response, if it carried any.
    pub fn identity(&self) -> Option<UserIdentity> {
        match &self.user {
            Some(user) => {
                let mut user = user.clone();
                if user.roles.is_empty() {
                    user.roles = self.roles.clone();
                }
                Some(user)
            }
            None if !self.roles.is_empty() => Some(UserIdentity {
                roles: self.roles.clone(),
                ..Default::default()
            }),
            None => None,
        }
    }
}

/// Response from `register`.
#[derive(Debug, Deserialize)]
pub(crate) struct RegisterResponse {
    #[serde(default, alias = "accessToken")]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<RegisteredUser>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisteredUser {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl From<RegisteredUser> for UserIdentity {
    fn from(user: RegisteredUser) -> Self {
        UserIdentity {
            id: user.id,
            username: user.name,
            email: None,
            roles: user.role.into_iter().collect(),
        }
    }
}
