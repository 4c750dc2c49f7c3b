//! Navigation Component
//!
//! Header navigation bar with brand and links.

use leptos::*;
use leptos_router::*;

use crate::state::use_app_config;

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let router = use_app_config().router.clone();

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href=router.href("/") class="flex items-center space-x-3">
                        <span class="text-xl font-bold text-white">"Resume Portal"</span>
                    </A>

                    <div class="flex items-center space-x-1">
                        <NavLink href=router.href("/") label="Home" />
                        <NavLink href=router.href("/resume") label="Resume" />
                        <NavLink href=router.href("/upload") label="Upload" />
                        <NavLink href=router.href("/sign-in") label="Sign in" />
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(
    href: String,
    label: &'static str,
) -> impl IntoView {
    view! {
        <A
            href=href
            exact=true
            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
            active_class="bg-gray-700 text-white"
        >
            {label}
        </A>
    }
}
