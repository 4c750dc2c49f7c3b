//! Upload Dashboard
//!
//! Signed-in view for replacing the published resume.

use leptos::*;
use resume_portal::{QueryKey, ToastContent};

use crate::api;
use crate::components::LoadingOverlay;
use crate::hooks::use_query;
use crate::pages::resume::RESUME_KEY;
use crate::state::{use_app_config, use_query_client, use_toasts};

/// Upload dashboard page component
#[component]
pub fn UploadResumeDashboard() -> impl IntoView {
    let config = use_app_config();
    let client = use_query_client();
    let toasts = use_toasts();

    let (version, set_version) = create_signal(0u32);
    let current = use_query(QueryKey::from(RESUME_KEY), version.into());

    let file_input = create_node_ref::<html::Input>();
    let (uploading, set_uploading) = create_signal(false);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();

        let Some(file) = file_input
            .get()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
        else {
            if let Ok(toasts) = &toasts {
                toasts.toast(ToastContent::new("Choose a file first").destructive());
            }
            return;
        };

        set_uploading.set(true);
        let base = config.api.base_url.clone();
        let client = client.clone();
        let toasts = toasts.clone();
        spawn_local(async move {
            let result = api::upload_resume(&base, &file).await;
            match (&result, &toasts) {
                (Ok(_), Ok(toasts)) => {
                    toasts.toast(ToastContent::new("Resume uploaded").description(file.name()));
                }
                (Err(e), Ok(toasts)) => {
                    toasts.toast(
                        ToastContent::new("Upload failed")
                            .description(e.to_string())
                            .destructive(),
                    );
                }
                (_, Err(e)) => logging::warn!("{}", e),
            }
            if result.is_ok() {
                if let Ok(client) = &client {
                    client.invalidate_queries(RESUME_KEY);
                }
                set_version.update(|v| *v += 1);
            }
            set_uploading.set(false);
        });
    };

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Upload resume"</h1>
                <p class="text-gray-400 mt-1">"The new file replaces the published version."</p>
            </div>

            <LoadingOverlay loading=uploading>
                <form on:submit=on_submit class="bg-gray-800 rounded-xl p-6 space-y-4">
                    <input
                        type="file"
                        accept=".pdf,.doc,.docx"
                        node_ref=file_input
                        class="block w-full text-sm text-gray-300"
                    />
                    <button
                        type="submit"
                        class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
                        disabled=move || uploading.get()
                    >
                        "Upload"
                    </button>
                </form>
            </LoadingOverlay>

            <section class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-2">"Currently published"</h2>
                <Suspense fallback=move || view! { <p class="text-gray-400">"Loading..."</p> }>
                    {move || current.get().map(|result| match result {
                        Ok(data) => {
                            let name = data["name"].as_str().unwrap_or("Nothing yet").to_string();
                            view! { <p>{name}</p> }.into_view()
                        }
                        Err(e) => view! { <p class="text-red-400">{e.to_string()}</p> }.into_view(),
                    })}
                </Suspense>
            </section>
        </div>
    }
}
