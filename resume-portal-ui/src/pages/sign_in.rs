//! Sign In Page
//!
//! Credential form; on success the session cookie is set by the server and
//! the user lands on the upload dashboard.

use leptos::*;
use leptos_router::*;
use resume_portal::ToastContent;
use serde::Serialize;

use crate::api::{self, Method};
use crate::state::{use_app_config, use_query_client, use_toasts};

#[derive(Serialize)]
struct SignInRequest {
    email: String,
    password: String,
}

/// Sign-in page component
#[component]
pub fn ResumeUploadSignIn() -> impl IntoView {
    let config = use_app_config();
    let client = use_query_client();
    let toasts = use_toasts();
    let navigate = use_navigate();

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        set_submitting.set(true);

        let body = SignInRequest {
            email: email.get(),
            password: password.get(),
        };
        let base = config.api.base_url.clone();
        let upload = config.router.href("/upload");
        let client = client.clone();
        let toasts = toasts.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::api_request(Method::Post, &base, "/api/auth/sign-in", Some(&body)).await {
                Ok(_) => {
                    // Cached reads were made without the session
                    if let Ok(client) = &client {
                        client.clear();
                    }
                    navigate(&upload, Default::default());
                }
                Err(e) => match &toasts {
                    Ok(toasts) => {
                        toasts.toast(
                            ToastContent::new("Sign in failed")
                                .description(e.to_string())
                                .destructive(),
                        );
                    }
                    Err(provider) => logging::warn!("{}: {}", provider, e),
                },
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="max-w-md mx-auto">
            <form data-animate="fade-up" on:submit=on_submit class="bg-gray-800 rounded-xl p-6 space-y-4">
                <h1 class="text-2xl font-bold">"Sign in"</h1>

                <label class="block">
                    <span class="text-sm text-gray-400">"Email"</span>
                    <input
                        type="email"
                        required=true
                        class="mt-1 w-full rounded-lg bg-gray-700 px-3 py-2"
                        prop:value=email
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </label>

                <label class="block">
                    <span class="text-sm text-gray-400">"Password"</span>
                    <input
                        type="password"
                        required=true
                        class="mt-1 w-full rounded-lg bg-gray-700 px-3 py-2"
                        prop:value=password
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </label>

                <button
                    type="submit"
                    class="w-full px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
                    disabled=move || submitting.get()
                >
                    {move || if submitting.get() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </div>
    }
}
