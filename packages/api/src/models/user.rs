//! # Signed-in user as seen by the client
//!
//! [`UserInfo`] is the client-safe projection of the identity provider's user
//! record. It crosses the server/client boundary via Dioxus server functions, so
//! it is `Serialize + Deserialize + PartialEq` and keeps the id as a `String`.
//! Tokens never leave the server session.

use serde::{Deserialize, Serialize};

use crate::provider::ProviderUser;

/// User information safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub email: Option<String>,
}

impl UserInfo {
    /// Get display name, falling back to the id if the provider sent no email.
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.id)
    }
}

impl From<&ProviderUser> for UserInfo {
    fn from(user: &ProviderUser) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
        }
    }
}
