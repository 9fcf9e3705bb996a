//! Authenticated user identity and role.

use serde::{Deserialize, Serialize};

/// Role string the API uses for administrators.
pub const ADMIN_ROLE: &str = "ROLE_ADMIN";

/// Coarse role used to gate back-office operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Derive the role from the API's role list.
    pub fn from_roles<S: AsRef<str>>(roles: &[S]) -> Self {
        if roles.iter().any(|r| r.as_ref() == ADMIN_ROLE) {
            Role::Admin
        } else {
            Role::User
        }
    }
}

/// Minimal identity returned alongside a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserIdentity {
    pub fn role(&self) -> Role {
        Role::from_roles(&self.roles)
    }

    /// Best display name: username, then e-mail.
    pub fn display_name(&self) -> Option<&str> {
        self.username.as_deref().or(self.email.as_deref())
    }
}
