//! Requesting a one-time sign-in link.

use crate::error::ApiError;
use crate::provider::{IdentityProvider, MagicLinkRequest};

/// Response message for a link that was handed to the provider.
pub const MAGIC_LINK_SENT: &str = "Magic link sent successfully";

/// Path the emailed link points at.
pub const CALLBACK_PATH: &str = "/auth/callback";

/// Absolute callback URL for the configured site.
pub fn callback_url(site_url: &str) -> String {
    format!("{}{}", site_url.trim_end_matches('/'), CALLBACK_PATH)
}

/// Ask the provider to email a sign-in link to `email`.
///
/// A missing or blank email fails with [`ApiError::EmailRequired`] before the
/// provider is contacted. Returns the trimmed address the link went to.
pub async fn request_magic_link(
    provider: &dyn IdentityProvider,
    email: Option<&str>,
    redirect_to: String,
    code_challenge: Option<String>,
) -> Result<String, ApiError> {
    let email = email.map(str::trim).unwrap_or_default();
    if email.is_empty() {
        return Err(ApiError::EmailRequired);
    }

    provider
        .send_magic_link(MagicLinkRequest {
            email: email.to_string(),
            redirect_to,
            code_challenge,
        })
        .await
        .map_err(|e| {
            tracing::warn!("Magic link request for {} refused: {}", email, e);
            ApiError::from(e)
        })?;

    tracing::info!("Magic link sent to {}", email);
    Ok(email.to_string())
}
