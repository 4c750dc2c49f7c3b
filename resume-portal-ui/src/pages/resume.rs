//! Resume Page
//!
//! Shows the published resume, read through the shared query cache.

use leptos::*;
use leptos_router::*;
use resume_portal::{QueryError, QueryKey};
use serde_json::Value;

use crate::components::SectionSkeleton;
use crate::hooks::use_query;
use crate::state::use_app_config;

/// Cache key of the published resume
pub const RESUME_KEY: &str = "/api/resume";

/// Resume page component
#[component]
pub fn Resume() -> impl IntoView {
    let (version, set_version) = create_signal(0u32);
    let resume = use_query(QueryKey::from(RESUME_KEY), version.into());

    view! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"Resume"</h1>
                <button
                    class="px-4 py-2 bg-gray-700 hover:bg-gray-600 rounded-lg text-sm"
                    on:click=move |_| set_version.update(|v| *v += 1)
                >
                    "Refresh"
                </button>
            </div>

            <Suspense fallback=move || view! { <SectionSkeleton /> }>
                {move || resume.get().map(|result| match result {
                    Ok(data) => view! { <ResumeBody data=data /> }.into_view(),
                    Err(e) => view! { <ResumeError error=e /> }.into_view(),
                })}
            </Suspense>
        </div>
    }
}

#[component]
fn ResumeBody(data: Value) -> impl IntoView {
    if data.is_null() {
        return view! {
            <div data-animate="fade-up" class="bg-gray-800 rounded-xl p-6 text-gray-400">
                "No resume has been uploaded yet."
            </div>
        }
        .into_view();
    }

    let name = data["name"].as_str().unwrap_or("Untitled resume").to_string();
    let updated = data["updatedAt"].as_str().map(str::to_string);
    let file_url = data["fileUrl"].as_str().map(str::to_string);
    let sections = data["sections"].as_array().cloned().unwrap_or_default();

    view! {
        <article data-animate="fade-up" class="bg-gray-800 rounded-xl p-6 space-y-6">
            <header>
                <h2 class="text-2xl font-semibold">{name}</h2>
                {updated.map(|at| view! { <p class="text-sm text-gray-400">"Updated " {at}</p> })}
            </header>

            {sections.into_iter().map(|section| {
                let title = section["title"].as_str().unwrap_or_default().to_string();
                let content = section["content"].as_str().unwrap_or_default().to_string();
                view! {
                    <section data-animate="fade-up">
                        <h3 class="text-lg font-medium mb-1">{title}</h3>
                        <p class="text-gray-300 whitespace-pre-line">{content}</p>
                    </section>
                }
            }).collect_view()}

            {file_url.map(|href| view! {
                <a href=href target="_blank" class="text-primary-400 hover:underline">
                    "Download PDF"
                </a>
            })}
        </article>
    }
    .into_view()
}

#[component]
fn ResumeError(error: QueryError) -> impl IntoView {
    let unauthorized = error.is_unauthorized();
    let sign_in = use_app_config().router.href("/sign-in");
    view! {
        <div class="bg-red-900/40 border border-red-700 rounded-xl p-6 space-y-2">
            <p class="font-medium">"Couldn't load the resume"</p>
            <p class="text-sm text-gray-300">{error.to_string()}</p>
            <Show when=move || unauthorized>
                <A href=sign_in.clone() class="text-primary-400 hover:underline">"Sign in"</A>
            </Show>
        </div>
    }
}
