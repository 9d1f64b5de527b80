//! # Supabase client
//!
//! One `reqwest::Client` talking to the two Supabase services the app uses:
//!
//! - **GoTrue** (`/auth/v1`): magic-link issuance (`POST /otp`), PKCE code
//!   exchange (`POST /token?grant_type=pkce`) and token verification (`GET /user`).
//! - **PostgREST** (`/rest/v1/properties`): row-scoped CRUD. Requests carry the
//!   caller's access token so the table's row-level policy applies, and are also
//!   filtered by `user_id` explicitly.
//!
//! Every request sends the project's anon key as `apikey`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use store::{Caller, NewProperty, Property, PropertyTable, PropertyUpdate, StoreError};

use crate::provider::{
    IdentityProvider, MagicLinkRequest, ProviderError, ProviderSession, ProviderUser,
};

const PROPERTY_COLUMNS: &str = "id,user_id,latitude,longitude,price,image_url,created_at";

#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    anon_key: String,
}

/// Row shape returned by PostgREST. `id` may be an integer or uuid column.
#[derive(Debug, Deserialize)]
struct PropertyRow {
    id: serde_json::Value,
    user_id: String,
    latitude: f64,
    longitude: f64,
    price: f64,
    image_url: String,
    created_at: DateTime<Utc>,
}

impl From<PropertyRow> for Property {
    fn from(row: PropertyRow) -> Self {
        let id = match row.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        Property {
            id,
            user_id: row.user_id,
            latitude: row.latitude,
            longitude: row.longitude,
            price: row.price,
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

/// Pull a human-readable message out of a GoTrue or PostgREST error body.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["msg", "error_description", "message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}

async fn rejected(response: Response) -> ProviderError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ProviderError::Rejected {
        status: status.as_u16(),
        message: error_message(status, &body),
    }
}

fn transport(e: reqwest::Error) -> ProviderError {
    ProviderError::Transport(e.to_string())
}

fn store_error(e: ProviderError) -> StoreError {
    match e {
        ProviderError::Rejected { status, message } if status == 401 || status == 403 => {
            StoreError::Forbidden(message)
        }
        ProviderError::Rejected { message, .. } => StoreError::Backend(message),
        other => StoreError::Unavailable(other.to_string()),
    }
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn auth(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    fn table(&self) -> String {
        format!("{}/rest/v1/properties", self.base_url)
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("apikey", &self.anon_key)
    }

    fn as_caller(&self, request: RequestBuilder, caller: &Caller) -> RequestBuilder {
        self.with_key(request)
            .bearer_auth(&caller.access_token)
            .header("Prefer", "return=representation")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ProviderError> {
        let response = request.send().await.map_err(transport)?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(rejected(response).await)
        }
    }

    async fn rows(&self, request: RequestBuilder) -> Result<Vec<Property>, StoreError> {
        let rows: Vec<PropertyRow> = self
            .send(request)
            .await
            .map_err(store_error)?
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(rows.into_iter().map(Property::from).collect())
    }
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    async fn send_magic_link(&self, request: MagicLinkRequest) -> Result<(), ProviderError> {
        let mut body = json!({
            "email": request.email,
            "create_user": true,
        });
        if let Some(challenge) = request.code_challenge {
            body["code_challenge"] = json!(challenge);
            body["code_challenge_method"] = json!("s256");
        }

        self.send(
            self.with_key(self.http.post(self.auth("/otp")))
                .query(&[("redirect_to", request.redirect_to.as_str())])
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<ProviderSession, ProviderError> {
        self.send(
            self.with_key(self.http.post(self.auth("/token")))
                .query(&[("grant_type", "pkce")])
                .json(&json!({ "auth_code": code, "code_verifier": code_verifier })),
        )
        .await?
        .json()
        .await
        .map_err(|e| ProviderError::Decode(e.to_string()))
    }

    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError> {
        self.send(
            self.with_key(self.http.get(self.auth("/user")))
                .bearer_auth(access_token),
        )
        .await?
        .json()
        .await
        .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PropertyTable for SupabaseClient {
    async fn list(&self, caller: &Caller) -> Result<Vec<Property>, StoreError> {
        let user_filter = format!("eq.{}", caller.user_id);
        self.rows(
            self.as_caller(self.http.get(self.table()), caller).query(&[
                ("select", PROPERTY_COLUMNS),
                ("user_id", user_filter.as_str()),
                ("order", "created_at.asc"),
            ]),
        )
        .await
    }

    async fn insert(&self, caller: &Caller, input: NewProperty) -> Result<Property, StoreError> {
        let body = json!({
            "user_id": caller.user_id,
            "latitude": input.latitude,
            "longitude": input.longitude,
            "price": input.price,
            "image_url": input.image_url,
        });
        self.rows(
            self.as_caller(self.http.post(self.table()), caller)
                .query(&[("select", PROPERTY_COLUMNS)])
                .json(&body),
        )
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::Unavailable("insert returned no row".to_string()))
    }

    async fn update(
        &self,
        caller: &Caller,
        id: &str,
        update: PropertyUpdate,
    ) -> Result<Property, StoreError> {
        let id_filter = format!("eq.{id}");
        let user_filter = format!("eq.{}", caller.user_id);
        self.rows(
            self.as_caller(self.http.patch(self.table()), caller)
                .query(&[
                    ("select", PROPERTY_COLUMNS),
                    ("id", id_filter.as_str()),
                    ("user_id", user_filter.as_str()),
                ])
                .json(&json!({ "price": update.price, "image_url": update.image_url })),
        )
        .await?
        .into_iter()
        .next()
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, caller: &Caller, id: &str) -> Result<(), StoreError> {
        let id_filter = format!("eq.{id}");
        let user_filter = format!("eq.{}", caller.user_id);
        let removed = self
            .rows(
                self.as_caller(self.http.delete(self.table()), caller)
                    .query(&[
                        ("select", PROPERTY_COLUMNS),
                        ("id", id_filter.as_str()),
                        ("user_id", user_filter.as_str()),
                    ]),
            )
            .await?;
        if removed.is_empty() {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_gotrue() {
        let body = r#"{"code":429,"error_code":"over_email_send_rate_limit","msg":"Email rate limit exceeded"}"#;
        assert_eq!(
            error_message(StatusCode::TOO_MANY_REQUESTS, body),
            "Email rate limit exceeded"
        );

        let body = r#"{"error":"invalid_grant","error_description":"Invalid Refresh Token"}"#;
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, body),
            "Invalid Refresh Token"
        );
    }

    #[test]
    fn test_error_message_from_postgrest() {
        let body = r#"{"code":"42501","message":"new row violates row-level security policy for table \"properties\""}"#;
        assert!(error_message(StatusCode::FORBIDDEN, body).starts_with("new row violates"));
    }

    #[test]
    fn test_error_message_fallback() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>upstream</html>"),
            "Bad Gateway"
        );
    }

    #[test]
    fn test_row_with_numeric_id() {
        let row: PropertyRow = serde_json::from_str(
            r#"{"id":17,"user_id":"6f1c","latitude":-6.2088,"longitude":106.8456,
                "price":500000,"image_url":"https://example.com/a.jpg",
                "created_at":"2024-05-01T10:00:00.123456+00:00"}"#,
        )
        .unwrap();

        let property = Property::from(row);
        assert_eq!(property.id, "17");
        assert_eq!(property.price_label(), "Rp. 500,000");
    }

    #[test]
    fn test_policy_refusal_is_forbidden() {
        let err = store_error(ProviderError::Rejected {
            status: 403,
            message: "permission denied".into(),
        });
        assert_eq!(err, StoreError::Forbidden("permission denied".into()));
    }

    #[test]
    fn test_unreachable_backend_is_unavailable() {
        let err = store_error(ProviderError::Transport(
            "error sending request for url (https://abc.supabase.co/rest/v1/properties)".into(),
        ));
        assert!(matches!(err, StoreError::Unavailable(_)));

        let err = store_error(ProviderError::Rejected {
            status: 400,
            message: "invalid input syntax".into(),
        });
        assert_eq!(err, StoreError::Backend("invalid input syntax".into()));
    }

    #[test]
    fn test_endpoints() {
        let client = SupabaseClient::new("https://abc.supabase.co/", "anon");
        assert_eq!(client.auth("/otp"), "https://abc.supabase.co/auth/v1/otp");
        assert_eq!(client.table(), "https://abc.supabase.co/rest/v1/properties");
    }
}
