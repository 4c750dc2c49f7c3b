//! Home Page
//!
//! Landing page introducing the portal.

use leptos::*;
use leptos_router::*;

use crate::components::Tooltip;
use crate::state::use_app_config;

/// Home page component
#[component]
pub fn Home() -> impl IntoView {
    let config = use_app_config();
    let upload = config.router.href("/upload");
    let resume = config.router.href("/resume");

    view! {
        <div class="space-y-16">
            <section data-animate="fade-up" class="text-center py-16">
                <h1 class="text-5xl font-bold mb-4">"Your resume, always current"</h1>
                <p class="text-xl text-gray-400 mb-8">
                    "Upload once, share a single link, and keep it up to date from anywhere."
                </p>
                <div class="flex items-center justify-center space-x-4">
                    <Tooltip label="Sign in to upload a new version">
                        <A
                            href=upload
                            class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
                        >
                            "Upload resume"
                        </A>
                    </Tooltip>
                    <A
                        href=resume
                        class="px-6 py-3 bg-gray-700 hover:bg-gray-600 rounded-lg font-medium transition-colors"
                    >
                        "View resume"
                    </A>
                </div>
            </section>

            <section class="grid grid-cols-1 md:grid-cols-3 gap-6">
                <Feature
                    title="Upload"
                    body="Drop in a PDF and it replaces the published version right away."
                />
                <Feature
                    title="Share"
                    body="One address that always points at your latest resume."
                />
                <Feature
                    title="Stay private"
                    body="Only you can change it once you're signed in."
                />
            </section>
        </div>
    }
}

#[component]
fn Feature(title: &'static str, body: &'static str) -> impl IntoView {
    view! {
        <div data-animate="fade-up" class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-2">{title}</h2>
            <p class="text-gray-400">{body}</p>
        </div>
    }
}
