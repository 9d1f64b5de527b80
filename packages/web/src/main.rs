use dioxus::prelude::*;

use ui::{AuthProvider, QueryProvider, UI_CSS};
use views::{AuthError, HandleToken, Home, Login};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
    #[route("/login")]
    Login {},
    #[route("/auth-error")]
    AuthError {},
    #[route("/auth/callback/handle-token")]
    HandleToken {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    {
        init_tracing();
        let result = tokio::runtime::Runtime::new()
            .map_err(anyhow::Error::from)
            .and_then(|runtime| runtime.block_on(launch_server()));
        if let Err(e) = result {
            tracing::error!("Server failed: {:#}", e);
            std::process::exit(1);
        }
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[cfg(feature = "server")]
async fn launch_server() -> anyhow::Result<()> {
    use anyhow::Context;
    use axum::routing::{get, post};
    use axum::{middleware, Extension};
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use tower_sessions::cookie::{time, SameSite};
    use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

    use api::context::AppContext;
    use api::http::{auth_callback, magic_link, require_session};
    use api::settings::Settings;

    let settings = Settings::new().context("Invalid configuration")?;
    tracing::info!(
        "Using Supabase at {} for site {}",
        settings.supabase_url,
        settings.site_url
    );
    let ctx = AppContext::supabase(settings);

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false) // Set to true in production with HTTPS
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(7)));

    let router = axum::Router::new()
        // Magic-link endpoints first
        .route("/api/auth/magic-link", post(magic_link))
        .route(api::auth::CALLBACK_PATH, get(auth_callback))
        // Then serve the Dioxus application
        .serve_dioxus_application(ServeConfig::new(), App)
        // Innermost first: gate, shared context, then the session it reads
        .layer(middleware::from_fn(require_session))
        .layer(Extension(ctx))
        .layer(session_layer);

    // Use the address from dx serve or default to localhost:8080
    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router.into_make_service())
        .await
        .context("Server error")
}

#[component]
fn App() -> Element {
    rsx! {
        // Global app resources
        document::Title { "Property Map" }
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Link { rel: "stylesheet", href: UI_CSS }

        AuthProvider {
            QueryProvider {
                Router::<Route> {}
            }
        }
    }
}
