//! Query cache hooks.
//!
//! One [`QueryCache`] per page lives in a context signal. Readers subscribe to
//! the entry's version and refetch when a mutation invalidates it; mutations
//! never write results into the cache themselves.

use api::Property;
use dioxus::prelude::*;
use store::QueryCache;

/// Cache key of the signed-in user's property list.
pub const PROPERTIES_KEY: &str = "properties";

pub type PropertyCache = Signal<QueryCache<Vec<Property>>>;

pub fn use_query_cache() -> PropertyCache {
    use_context::<PropertyCache>()
}

#[component]
pub fn QueryProvider(children: Element) -> Element {
    use_context_provider(|| Signal::new(QueryCache::<Vec<Property>>::new()));

    rsx! {
        {children}
    }
}

/// The property list, refetched whenever [`use_invalidate_properties`] fires.
///
/// While a refetch is in flight the previous (stale) list keeps rendering.
pub fn use_properties() -> Memo<Vec<Property>> {
    let mut cache = use_query_cache();
    let version = use_memo(move || cache.read().version(PROPERTIES_KEY));

    let _loader = use_resource(move || async move {
        // Subscribe to invalidations only; `store` below leaves the version alone.
        let _ = version();
        if !cache.peek().is_stale(PROPERTIES_KEY) {
            return;
        }
        match api::list_properties().await {
            Ok(properties) => cache.write().store(PROPERTIES_KEY, properties),
            Err(e) => tracing::error!("Loading properties failed: {}", e),
        }
    });

    use_memo(move || {
        cache
            .read()
            .get(PROPERTIES_KEY)
            .cloned()
            .unwrap_or_default()
    })
}

/// Callback that marks the property list stale after a successful mutation.
pub fn use_invalidate_properties() -> Callback<()> {
    let mut cache = use_query_cache();
    use_callback(move |_| cache.write().invalidate(PROPERTIES_KEY))
}
