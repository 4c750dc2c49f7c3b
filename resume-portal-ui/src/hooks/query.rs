//! Query hook
//!
//! Reads through the session query client using the default HTTP query
//! function, so every page shares one cache.

use leptos::*;
use resume_portal::{QueryError, QueryKey, QueryResult};
use serde_json::Value;

use crate::api;
use crate::state::{use_app_config, use_query_client};

/// Fetch `key` through the shared cache.
///
/// `version` is part of the resource source; bump it to re-run the fetch
/// after invalidating.
pub fn use_query(key: QueryKey, version: Signal<u32>) -> Resource<u32, QueryResult<Value>> {
    let client = use_query_client();
    let config = use_app_config();

    create_local_resource(
        move || version.get(),
        move |_| {
            let key = key.clone();
            let client = client.clone();
            let base = config.api.base_url.clone();
            async move {
                let client = client.map_err(|e| QueryError::Network(e.to_string()))?;
                let on_unauthorized = client.options().on_unauthorized;
                client
                    .fetch_query(key, api::query_fn(base, on_unauthorized))
                    .await
            }
        },
    )
}
