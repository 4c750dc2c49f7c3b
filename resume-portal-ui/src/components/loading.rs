//! Loading Component
//!
//! Loading overlay and skeleton states.

use leptos::*;

/// Skeleton loader for the resume sections
#[component]
pub fn SectionSkeleton(
    #[prop(default = 3)]
    count: usize,
) -> impl IntoView {
    view! {
        <div class="space-y-4 animate-pulse">
            {(0..count).map(|_| view! {
                <div class="bg-gray-800 rounded-lg p-4">
                    <div class="h-4 bg-gray-700 rounded w-1/3 mb-3" />
                    <div class="h-4 bg-gray-700 rounded w-2/3" />
                </div>
            }).collect_view()}
        </div>
    }
}

/// Loading overlay for forms
#[component]
pub fn LoadingOverlay(
    #[prop(into)]
    loading: Signal<bool>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="relative">
            {children()}

            {move || {
                if loading.get() {
                    view! {
                        <div class="absolute inset-0 bg-gray-900/50 flex items-center justify-center rounded-lg">
                            <div class="loading-spinner w-8 h-8" />
                        </div>
                    }.into_view()
                } else {
                    view! {}.into_view()
                }
            }}
        </div>
    }
}
