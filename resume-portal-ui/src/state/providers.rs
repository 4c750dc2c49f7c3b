//! Context Providers
//!
//! Leptos components establishing the shared contexts, and the hooks views
//! use to reach them.

use leptos::*;
use resume_portal::{
    AppConfig, ProviderError, ProviderKind, QueryClient, ToastHandle,
    TooltipProvider as TooltipContext,
};
use std::rc::Rc;

/// Build the configuration from defaults plus local storage overrides.
///
/// Keys are the lower-cased environment variable names, e.g.
/// `resume_portal_api_url`.
pub fn load_config() -> AppConfig {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());

    let mut config = AppConfig::default();
    if let Some(storage) = storage {
        config.apply_overrides(|name| storage.get_item(&name.to_lowercase()).ok().flatten());
    }
    config
}

/// Makes the session query client available to descendants
#[component]
pub fn QueryClientProvider(client: QueryClient, children: Children) -> impl IntoView {
    provide_context(client);
    children()
}

/// Makes the tooltip context available to descendants
#[component]
pub fn TooltipProvider(tooltip: TooltipContext, children: Children) -> impl IntoView {
    provide_context(tooltip);
    children()
}

pub fn provide_app_config(config: Rc<AppConfig>) {
    provide_context(config);
}

pub fn provide_toasts(toasts: ToastHandle) {
    provide_context(toasts);
}

/// The shared query client
pub fn use_query_client() -> Result<QueryClient, ProviderError> {
    use_context::<QueryClient>().ok_or(ProviderError::NotMounted(ProviderKind::QueryClient))
}

/// The tooltip context
pub fn use_tooltip() -> Result<TooltipContext, ProviderError> {
    use_context::<TooltipContext>().ok_or(ProviderError::NotMounted(ProviderKind::Tooltip))
}

/// Handle for showing toasts
pub fn use_toasts() -> Result<ToastHandle, ProviderError> {
    use_context::<ToastHandle>().ok_or(ProviderError::NotMounted(ProviderKind::Toaster))
}

pub fn use_app_config() -> Rc<AppConfig> {
    use_context::<Rc<AppConfig>>().unwrap_or_default()
}
