//! Not Found Page

use leptos::*;
use leptos_router::*;
use resume_portal::NOT_FOUND_MESSAGE;

use crate::state::use_app_config;

/// Fallback view for undeclared paths
#[component]
pub fn NotFound() -> impl IntoView {
    let home = use_app_config().router.href("/");

    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <h1 class="text-3xl font-bold mb-6">{NOT_FOUND_MESSAGE}</h1>
            <A
                href=home
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "Go home"
            </A>
        </div>
    }
}
