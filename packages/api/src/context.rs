//! Shared server state, built once at startup and attached to every request as
//! an axum `Extension`.

use std::sync::Arc;

use store::PropertyTable;

use crate::auth::SessionGuard;
use crate::properties::PropertyService;
use crate::provider::IdentityProvider;
use crate::settings::Settings;
use crate::supabase::SupabaseClient;

#[derive(Clone)]
pub struct AppContext {
    pub identity: Arc<dyn IdentityProvider>,
    pub properties: PropertyService,
    pub guard: SessionGuard,
    pub settings: Arc<Settings>,
}

impl AppContext {
    pub fn new(
        settings: Settings,
        identity: Arc<dyn IdentityProvider>,
        table: Arc<dyn PropertyTable>,
    ) -> Self {
        Self {
            guard: SessionGuard::new(identity.clone(), settings.session_revalidate_secs),
            identity,
            properties: PropertyService::new(table),
            settings: Arc::new(settings),
        }
    }

    /// Production wiring: one Supabase client serves identity and data.
    pub fn supabase(settings: Settings) -> Self {
        let client = Arc::new(SupabaseClient::new(
            &settings.supabase_url,
            &settings.supabase_anon_key,
        ));
        Self::new(settings, client.clone(), client)
    }
}
