//! Application error type shared by server functions and HTTP handlers.

use store::validate::ValidationErrors;
use store::StoreError;
use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Email is required")]
    EmailRequired,
    #[error("{0}")]
    Validation(String),
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Property not found")]
    NotFound,
    /// The identity or data provider refused the request; the message is shown to the user.
    #[error("{0}")]
    Provider(String),
    #[error("Session error: {0}")]
    Session(String),
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// HTTP status used when the error leaves through a plain axum handler.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::EmailRequired | ApiError::Validation(_) | ApiError::Provider(_) => 400,
            ApiError::NotAuthenticated => 401,
            ApiError::NotFound => 404,
            ApiError::Session(_) | ApiError::Internal(_) => 500,
        }
    }

    /// Message safe to show the user. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Session(_) | ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl From<ProviderError> for ApiError {
    fn from(error: ProviderError) -> Self {
        match error {
            ProviderError::Rejected { message, .. } => ApiError::Provider(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Forbidden(message) | StoreError::Backend(message) => {
                ApiError::Provider(message)
            }
            StoreError::Unavailable(message) => ApiError::Internal(message),
        }
    }
}

#[cfg(feature = "server")]
impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status_code())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::json!({ "error": self.public_message() });
        (status, axum::Json(body)).into_response()
    }
}
