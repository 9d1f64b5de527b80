//! # API crate: shared fullstack server functions for the property map
//!
//! Every Dioxus server function the web frontend calls lives here, along with
//! the authentication and data-access plumbing behind them.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | none | Magic-link flow state machine, callback exchange, session data, session guard |
//! | [`error`] | none | [`ApiError`] and its HTTP mapping |
//! | [`models`] | none | Client-safe projections (`UserInfo`, `MapSettings`) |
//! | [`properties`] | none | [`PropertyService`]: authenticated, validated, owner-scoped mutations |
//! | [`provider`] | none | The [`IdentityProvider`] seam |
//! | `context` | `server` | `AppContext` shared by handlers and server functions |
//! | `http` | `server` | Magic-link and callback endpoints, `require_session` middleware |
//! | `settings` | `server` | Environment configuration |
//! | `supabase` | `server` | GoTrue and PostgREST client |
//!
//! ## Server functions exposed here
//!
//! Each is compiled twice: with the real body behind `#[cfg(feature = "server")]`
//! and as a client stub that forwards the call over HTTP.
//!
//! - **Authentication**: `get_current_user`, `logout`
//! - **Map**: `get_map_settings`
//! - **Properties**: `list_properties`, `create_property`, `update_property`, `delete_property`

use dioxus::prelude::*;

pub mod auth;
#[cfg(feature = "server")]
pub mod context;
pub mod error;
#[cfg(feature = "server")]
pub mod http;
pub mod models;
pub mod properties;
pub mod provider;
#[cfg(feature = "server")]
pub mod settings;
#[cfg(feature = "server")]
pub mod supabase;
#[cfg(test)]
mod testing;

pub use error::ApiError;
pub use models::{MapSettings, UserInfo};
pub use properties::PropertyService;
pub use provider::IdentityProvider;
pub use store::{NewProperty, Property, PropertyUpdate};

#[cfg(feature = "server")]
fn server_error(e: ApiError) -> ServerFnError {
    if e.status_code() >= 500 {
        tracing::error!("Server function failed: {}", e);
    }
    ServerFnError::new(e.public_message())
}

#[cfg(feature = "server")]
async fn current_caller(
    ctx: &context::AppContext,
    session: &tower_sessions::Session,
) -> Result<Option<store::Caller>, ServerFnError> {
    let auth = ctx.guard.current_session(session).await.map_err(server_error)?;
    Ok(auth.map(|a| a.caller()))
}

/// Get the current authenticated user from the session.
#[cfg(feature = "server")]
#[get("/api/auth/me", session: tower_sessions::Session, ctx: axum::Extension<context::AppContext>)]
pub async fn get_current_user() -> Result<Option<UserInfo>, ServerFnError> {
    let auth = ctx.guard.current_session(&session).await.map_err(server_error)?;
    Ok(auth.map(|a| a.user_info()))
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/me")]
pub async fn get_current_user() -> Result<Option<UserInfo>, ServerFnError> {
    Ok(None)
}

/// Log out the current user by clearing the session.
#[cfg(feature = "server")]
#[post("/api/auth/logout", session: tower_sessions::Session)]
pub async fn logout() -> Result<(), ServerFnError> {
    auth::session::sign_out(&session).await.map_err(server_error)?;
    tracing::info!("Session signed out");
    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/logout")]
pub async fn logout() -> Result<(), ServerFnError> {
    Ok(())
}

/// Tile source and initial viewport for the map.
#[cfg(feature = "server")]
#[get("/api/map/settings", ctx: axum::Extension<context::AppContext>)]
pub async fn get_map_settings() -> Result<MapSettings, ServerFnError> {
    Ok(ctx.settings.map_settings())
}

#[cfg(not(feature = "server"))]
#[get("/api/map/settings")]
pub async fn get_map_settings() -> Result<MapSettings, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// All properties of the signed-in user.
#[cfg(feature = "server")]
#[get("/api/properties", session: tower_sessions::Session, ctx: axum::Extension<context::AppContext>)]
pub async fn list_properties() -> Result<Vec<Property>, ServerFnError> {
    let caller = current_caller(&ctx, &session).await?;
    ctx.properties
        .list(caller.as_ref())
        .await
        .map_err(server_error)
}

#[cfg(not(feature = "server"))]
#[get("/api/properties")]
pub async fn list_properties() -> Result<Vec<Property>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Create a property owned by the signed-in user.
#[cfg(feature = "server")]
#[post("/api/properties/create", session: tower_sessions::Session, ctx: axum::Extension<context::AppContext>)]
pub async fn create_property(input: NewProperty) -> Result<Property, ServerFnError> {
    let caller = current_caller(&ctx, &session).await?;
    ctx.properties
        .create(caller.as_ref(), input)
        .await
        .map_err(server_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/properties/create")]
pub async fn create_property(input: NewProperty) -> Result<Property, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Change price and image of one of the signed-in user's properties.
#[cfg(feature = "server")]
#[post("/api/properties/update", session: tower_sessions::Session, ctx: axum::Extension<context::AppContext>)]
pub async fn update_property(id: String, update: PropertyUpdate) -> Result<Property, ServerFnError> {
    let caller = current_caller(&ctx, &session).await?;
    ctx.properties
        .update(caller.as_ref(), &id, update)
        .await
        .map_err(server_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/properties/update")]
pub async fn update_property(id: String, update: PropertyUpdate) -> Result<Property, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Delete one of the signed-in user's properties.
#[cfg(feature = "server")]
#[post("/api/properties/delete", session: tower_sessions::Session, ctx: axum::Extension<context::AppContext>)]
pub async fn delete_property(id: String) -> Result<(), ServerFnError> {
    let caller = current_caller(&ctx, &session).await?;
    ctx.properties
        .delete(caller.as_ref(), &id)
        .await
        .map_err(server_error)
}

#[cfg(not(feature = "server"))]
#[post("/api/properties/delete")]
pub async fn delete_property(id: String) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}
