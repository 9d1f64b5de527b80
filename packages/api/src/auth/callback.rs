//! Completing a followed magic link.
//!
//! The provider redirects to `/auth/callback` with either `code` (PKCE flow, the
//! verifier was stored in the session when the link was requested) or an
//! `access_token` issued directly. Both end in an [`AuthSession`].

use serde::Deserialize;

use super::flow::{AuthEvent, AuthPhase};
use super::session::AuthSession;
use crate::error::ApiError;
use crate::provider::{IdentityProvider, ProviderSession};

/// Where a successful callback sends the browser.
pub const HANDLE_TOKEN_PATH: &str = "/auth/callback/handle-token";

/// Where a failed callback sends the browser.
pub const AUTH_ERROR_PATH: &str = "/auth-error";

/// Query parameters of the callback URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub error_description: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Exchange the callback parameters for a session.
///
/// `verifier` is the PKCE verifier taken from the server session, if any.
pub async fn complete_callback(
    provider: &dyn IdentityProvider,
    params: &CallbackParams,
    verifier: Option<String>,
    now: i64,
) -> Result<AuthSession, ApiError> {
    let phase = AuthPhase::Anonymous
        .apply(AuthEvent::LinkFollowed)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let outcome = exchange(provider, params, verifier).await;

    let event = match &outcome {
        Ok(session) => AuthEvent::ExchangeSucceeded {
            user: (&session.user).into(),
        },
        Err(e) => AuthEvent::Failed {
            message: e.to_string(),
        },
    };
    match phase.apply(event) {
        Ok(AuthPhase::Authenticated { user }) => {
            tracing::info!("User {} signed in", user.id);
        }
        Ok(AuthPhase::Failed { message }) => {
            tracing::warn!("Magic link callback failed: {}", message);
        }
        Ok(_) => {}
        Err(e) => return Err(ApiError::Internal(e.to_string())),
    }

    outcome.map(|session| AuthSession::from_provider(session, now))
}

async fn exchange(
    provider: &dyn IdentityProvider,
    params: &CallbackParams,
    verifier: Option<String>,
) -> Result<ProviderSession, ApiError> {
    if let Some(description) = non_empty(&params.error_description) {
        return Err(ApiError::Provider(description.to_string()));
    }

    if let Some(token) = non_empty(&params.access_token) {
        let user = provider.get_user(token).await?;
        return Ok(ProviderSession {
            access_token: token.to_string(),
            refresh_token: params.refresh_token.clone(),
            user,
        });
    }

    if let Some(code) = non_empty(&params.code) {
        let Some(verifier) = verifier else {
            return Err(ApiError::Provider(
                "This login link was requested from another browser. Please request a new link."
                    .to_string(),
            ));
        };
        return Ok(provider.exchange_code(code, &verifier).await?);
    }

    Err(ApiError::Validation("Missing authorization code".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeIdentity;

    #[tokio::test]
    async fn test_access_token_verified_with_provider() {
        let provider = FakeIdentity::new().with_token("jwt-1", "user-1");
        let params = CallbackParams {
            access_token: Some("jwt-1".into()),
            ..Default::default()
        };

        let session = complete_callback(&provider, &params, None, 42).await.unwrap();

        assert_eq!(session.user.id, "user-1");
        assert_eq!(session.access_token, "jwt-1");
        assert_eq!(session.validated_at, 42);
    }

    #[tokio::test]
    async fn test_invalid_access_token_fails() {
        let provider = FakeIdentity::new();
        let params = CallbackParams {
            access_token: Some("forged".into()),
            ..Default::default()
        };

        let err = complete_callback(&provider, &params, None, 0).await.unwrap_err();
        assert_eq!(err, ApiError::Provider("invalid JWT".into()));
    }

    #[tokio::test]
    async fn test_code_exchanged_with_verifier() {
        let provider = FakeIdentity::new().with_code("code-1", "verifier-1", "user-2");
        let params = CallbackParams {
            code: Some("code-1".into()),
            ..Default::default()
        };

        let session = complete_callback(&provider, &params, Some("verifier-1".into()), 7)
            .await
            .unwrap();

        assert_eq!(session.user.id, "user-2");
        assert_eq!(session.refresh_token.as_deref(), Some("refresh"));
    }

    #[tokio::test]
    async fn test_code_without_verifier_fails() {
        let provider = FakeIdentity::new().with_code("code-1", "verifier-1", "user-2");
        let params = CallbackParams {
            code: Some("code-1".into()),
            ..Default::default()
        };

        let err = complete_callback(&provider, &params, None, 0).await.unwrap_err();
        assert!(matches!(err, ApiError::Provider(_)));
    }

    #[tokio::test]
    async fn test_missing_parameters() {
        let provider = FakeIdentity::new();
        let params = CallbackParams {
            access_token: Some("  ".into()),
            ..Default::default()
        };

        let err = complete_callback(&provider, &params, None, 0).await.unwrap_err();
        assert_eq!(err, ApiError::Validation("Missing authorization code".into()));
    }

    #[tokio::test]
    async fn test_provider_error_description_passed_through() {
        let provider = FakeIdentity::new().with_token("jwt-1", "user-1");
        let params = CallbackParams {
            access_token: Some("jwt-1".into()),
            error_description: Some("Email link is invalid or has expired".into()),
            ..Default::default()
        };

        let err = complete_callback(&provider, &params, None, 0).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Provider("Email link is invalid or has expired".into())
        );
        assert_eq!(provider.user_lookups.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
