//! Plain axum endpoints and middleware that sit beside the Dioxus server
//! functions: the magic-link request, the emailed link's callback and the
//! request-level session gate.

use axum::body::Bytes;
use axum::extract::{Query, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use oauth2::PkceCodeChallenge;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_sessions::Session;

use crate::auth::{
    self, callback_url, complete_callback, is_api_path, is_public_path, request_magic_link,
    CallbackParams, AUTH_ERROR_PATH, HANDLE_TOKEN_PATH, LOGIN_PATH, MAGIC_LINK_SENT,
};
use crate::context::AppContext;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
struct MagicLinkBody {
    #[serde(default)]
    email: Option<String>,
}

/// `POST /api/auth/magic-link` with `{"email": "..."}`.
pub async fn magic_link(
    Extension(ctx): Extension<AppContext>,
    session: Session,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    // An unreadable body is treated like a missing email.
    let body: MagicLinkBody = serde_json::from_slice(&body).unwrap_or_default();

    let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
    request_magic_link(
        ctx.identity.as_ref(),
        body.email.as_deref(),
        callback_url(&ctx.settings.site_url),
        Some(challenge.as_str().to_string()),
    )
    .await?;

    auth::session::store_verifier(&session, verifier.secret())
        .await
        .map_err(|e| {
            tracing::error!("Could not store PKCE verifier: {}", e);
            e
        })?;

    Ok(Json(json!({ "message": MAGIC_LINK_SENT })))
}

/// `GET /auth/callback`: the emailed link lands here.
pub async fn auth_callback(
    Extension(ctx): Extension<AppContext>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    let site = &ctx.settings.site_url;

    let verifier = match auth::session::take_verifier(&session).await {
        Ok(verifier) => verifier,
        Err(e) => {
            tracing::error!("Could not read PKCE verifier: {}", e);
            None
        }
    };

    let signed_in = match complete_callback(
        ctx.identity.as_ref(),
        &params,
        verifier,
        auth::unix_now(),
    )
    .await
    {
        Ok(auth_session) => auth::session::sign_in(&session, &auth_session).await,
        Err(e) => Err(e),
    };

    match signed_in {
        Ok(()) => Redirect::to(&format!("{site}{HANDLE_TOKEN_PATH}")),
        Err(e) => {
            tracing::warn!("Sign-in from callback failed: {}", e);
            Redirect::to(&format!("{site}{AUTH_ERROR_PATH}"))
        }
    }
}

/// Gate every non-public path on a valid session.
///
/// Pages are redirected to the login route, API calls are refused with 401.
pub async fn require_session(
    Extension(ctx): Extension<AppContext>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if is_public_path(&path) {
        return next.run(request).await;
    }

    match ctx.guard.current_session(&session).await {
        Ok(Some(_)) => next.run(request).await,
        Ok(None) => deny(&path),
        Err(e) => {
            tracing::error!("Session check failed for {}: {}", path, e);
            deny(&path)
        }
    }
}

fn deny(path: &str) -> Response {
    if is_api_path(path) {
        ApiError::NotAuthenticated.into_response()
    } else {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, StatusCode};
    use axum::routing::{get, post};
    use axum::Router;
    use store::MemoryStore;
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore as SessionMemoryStore, SessionManagerLayer};

    use super::*;
    use crate::settings::{Settings, DEFAULT_TILE_URL};
    use crate::testing::FakeIdentity;

    fn settings() -> Settings {
        Settings {
            site_url: "http://localhost:8080".into(),
            supabase_url: "http://supabase.test".into(),
            supabase_anon_key: "anon".into(),
            maps_key: "maps".into(),
            map_tile_url: DEFAULT_TILE_URL.into(),
            session_revalidate_secs: 300,
        }
    }

    fn app(identity: Arc<FakeIdentity>) -> Router {
        let ctx = AppContext::new(settings(), identity, Arc::new(MemoryStore::new()));
        Router::new()
            .route("/", get(|| async { "map" }))
            .route("/login", get(|| async { "login" }))
            .route("/api/properties", get(|| async { "[]" }))
            .route("/api/auth/magic-link", post(magic_link))
            .route("/auth/callback", get(auth_callback))
            .layer(axum::middleware::from_fn(require_session))
            .layer(Extension(ctx))
            .layer(SessionManagerLayer::new(SessionMemoryStore::default()))
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request {
        axum::http::Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    #[tokio::test]
    async fn test_page_without_session_redirects_to_login() {
        let response = app(Arc::new(FakeIdentity::new()))
            .oneshot(get_request("/", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_api_without_session_is_unauthorized() {
        let response = app(Arc::new(FakeIdentity::new()))
            .oneshot(get_request("/api/properties", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await, json!({ "error": "Not authenticated" }));
    }

    #[tokio::test]
    async fn test_login_page_is_public() {
        let response = app(Arc::new(FakeIdentity::new()))
            .oneshot(get_request("/login", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_magic_link_requires_email() {
        let identity = Arc::new(FakeIdentity::new());
        let app = app(identity.clone());

        for body in [r#"{}"#, r#"{"email":""}"#, "not json"] {
            let response = app
                .clone()
                .oneshot(post_json("/api/auth/magic-link", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(json_body(response).await, json!({ "error": "Email is required" }));
        }
        assert_eq!(identity.sent(), 0);
    }

    #[tokio::test]
    async fn test_magic_link_sent() {
        let identity = Arc::new(FakeIdentity::new());

        let response = app(identity.clone())
            .oneshot(post_json("/api/auth/magic-link", r#"{"email":"m@example.com"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "message": "Magic link sent successfully" })
        );
        let sent = identity.links_sent.lock().unwrap();
        assert_eq!(sent[0].redirect_to, "http://localhost:8080/auth/callback");
        assert!(sent[0].code_challenge.is_some());
    }

    #[tokio::test]
    async fn test_magic_link_provider_refusal() {
        let identity = Arc::new(FakeIdentity {
            reject_links: Some("Signups not allowed for otp".into()),
            ..FakeIdentity::new()
        });

        let response = app(identity)
            .oneshot(post_json("/api/auth/magic-link", r#"{"email":"m@example.com"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Signups not allowed for otp" })
        );
    }

    #[tokio::test]
    async fn test_callback_signs_in_and_unlocks_pages() {
        let app = app(Arc::new(FakeIdentity::new().with_token("jwt-1", "user-1")));

        let response = app
            .clone()
            .oneshot(get_request("/auth/callback?access_token=jwt-1", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&response),
            "http://localhost:8080/auth/callback/handle-token"
        );

        let cookie = response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();

        let response = app.oneshot(get_request("/", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_callback_failures_go_to_error_page() {
        let app = app(Arc::new(FakeIdentity::new()));

        for uri in ["/auth/callback", "/auth/callback?access_token=forged", "/auth/callback?code=abc"] {
            let response = app.clone().oneshot(get_request(uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&response), "http://localhost:8080/auth-error");
        }
    }
}
