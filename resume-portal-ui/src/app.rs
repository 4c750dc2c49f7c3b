//! App Root Component
//!
//! Mounts the application root and renders its provider stack around the
//! page the router selects for the current location.

use leptos::*;
use leptos_router::{use_location, Router};
use resume_portal::{AppRoot, Location, MountedApp, Page, RenderTree};
use std::cell::RefCell;
use std::rc::Rc;

use crate::components::{Nav, Toaster};
use crate::hooks::GlobalAnimations;
use crate::pages::{Home, NotFound, Resume, ResumeUploadSignIn, UploadResumeDashboard};
use crate::state::{provide_app_config, provide_toasts, QueryClientProvider, TooltipProvider};

/// The mounted instance; emptied on cleanup, which tears it down
#[derive(Clone)]
struct MountedSlot(Rc<RefCell<Option<MountedApp>>>);

impl MountedSlot {
    fn render(&self, location: &Location) -> Option<RenderTree> {
        self.0.borrow_mut().as_mut().map(|app| app.render(location))
    }
}

/// Root application component
#[component]
pub fn App(root: Rc<AppRoot>) -> impl IntoView {
    let animations = GlobalAnimations::new(root.config().animation.clone());
    let mounted = root.mount(Box::new(animations));

    let context = mounted.context().clone();
    let queue = mounted.toaster().clone();
    let slot = MountedSlot(Rc::new(RefCell::new(Some(mounted))));

    {
        let slot = slot.clone();
        on_cleanup(move || {
            slot.0.borrow_mut().take();
        });
    }

    // Visible to the toaster and the routed pages alike
    provide_app_config(Rc::clone(&context.config));
    provide_toasts(context.toasts.clone());

    view! {
        <QueryClientProvider client=context.query_client.clone()>
            <TooltipProvider tooltip=context.tooltip.clone()>
                <Toaster queue=queue />
                <Router>
                    <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                        <Nav />
                        <main class="flex-1 container mx-auto px-4 py-8">
                            <AppRoutes slot=slot />
                        </main>
                    </div>
                </Router>
            </TooltipProvider>
        </QueryClientProvider>
    }
}

/// Router output: the page selected for the current location
#[component]
fn AppRoutes(slot: MountedSlot) -> impl IntoView {
    let location = use_location();

    let tree = create_memo(move |_| {
        let current = Location {
            pathname: location.pathname.get(),
            search: with_prefix('?', location.search.get()),
            hash: with_prefix('#', location.hash.get()),
        };
        slot.render(&current)
    });

    move || {
        tree.get().map(|tree| match tree.page {
            Page::Home => view! { <Home /> }.into_view(),
            Page::Resume => view! { <Resume /> }.into_view(),
            Page::UploadResumeDashboard => view! { <UploadResumeDashboard /> }.into_view(),
            Page::ResumeUploadSignIn => view! { <ResumeUploadSignIn /> }.into_view(),
            Page::NotFound => view! { <NotFound /> }.into_view(),
        })
    }
}

fn with_prefix(prefix: char, part: String) -> String {
    if part.is_empty() || part.starts_with(prefix) {
        part
    } else {
        format!("{}{}", prefix, part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resume_portal::{AppConfig, NoopAnimations};
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_with_prefix() {
        assert_eq!(with_prefix('?', String::new()), "");
        assert_eq!(with_prefix('?', "a=1".to_string()), "?a=1");
        assert_eq!(with_prefix('#', "#top".to_string()), "#top");
    }

    #[wasm_bindgen_test]
    fn test_slot_renders_until_emptied() {
        let root = AppRoot::new(AppConfig::default()).unwrap();
        let slot = MountedSlot(Rc::new(RefCell::new(Some(root.mount(Box::new(NoopAnimations))))));

        let tree = slot.render(&Location::parse("/sign-in")).unwrap();
        assert_eq!(tree.page, Page::ResumeUploadSignIn);

        let tree = slot.render(&Location::parse("/nope")).unwrap();
        assert!(tree.is_not_found());

        slot.0.borrow_mut().take();
        assert!(slot.render(&Location::root()).is_none());
    }
}
