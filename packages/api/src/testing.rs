//! In-process identity provider double for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::provider::{
    IdentityProvider, MagicLinkRequest, ProviderError, ProviderSession, ProviderUser,
};

/// Records calls and answers from fixed tables.
#[derive(Default)]
pub struct FakeIdentity {
    pub links_sent: Mutex<Vec<MagicLinkRequest>>,
    pub user_lookups: AtomicUsize,
    /// Access tokens `get_user` accepts, with the user they resolve to.
    pub tokens: Mutex<Vec<(String, ProviderUser)>>,
    /// `(code, verifier)` pairs `exchange_code` accepts.
    pub codes: Mutex<Vec<(String, String, ProviderSession)>>,
    /// When set, `send_magic_link` refuses with this message.
    pub reject_links: Option<String>,
    /// When set, every call fails as unreachable.
    pub offline: bool,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(self, token: &str, user_id: &str) -> Self {
        self.tokens.lock().unwrap().push((
            token.to_string(),
            ProviderUser {
                id: user_id.to_string(),
                email: Some(format!("{user_id}@example.com")),
            },
        ));
        self
    }

    pub fn with_code(self, code: &str, verifier: &str, user_id: &str) -> Self {
        let session = ProviderSession {
            access_token: format!("token-for-{user_id}"),
            refresh_token: Some("refresh".to_string()),
            user: ProviderUser {
                id: user_id.to_string(),
                email: None,
            },
        };
        self.codes
            .lock()
            .unwrap()
            .push((code.to_string(), verifier.to_string(), session));
        self
    }

    pub fn sent(&self) -> usize {
        self.links_sent.lock().unwrap().len()
    }

    fn check_online(&self) -> Result<(), ProviderError> {
        if self.offline {
            return Err(ProviderError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn send_magic_link(&self, request: MagicLinkRequest) -> Result<(), ProviderError> {
        self.check_online()?;
        if let Some(message) = &self.reject_links {
            return Err(ProviderError::Rejected {
                status: 422,
                message: message.clone(),
            });
        }
        self.links_sent.lock().unwrap().push(request);
        Ok(())
    }

    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<ProviderSession, ProviderError> {
        self.check_online()?;
        self.codes
            .lock()
            .unwrap()
            .iter()
            .find(|(c, v, _)| c == code && v == code_verifier)
            .map(|(_, _, s)| s.clone())
            .ok_or(ProviderError::Rejected {
                status: 400,
                message: "invalid flow state, no valid flow state found".to_string(),
            })
    }

    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError> {
        self.check_online()?;
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        self.tokens
            .lock()
            .unwrap()
            .iter()
            .find(|(t, _)| t == access_token)
            .map(|(_, u)| u.clone())
            .ok_or(ProviderError::Rejected {
                status: 401,
                message: "invalid JWT".to_string(),
            })
    }
}
