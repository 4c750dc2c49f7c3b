//! Toaster
//!
//! Renders the session toast queue. The queue itself lives in the
//! `resume-portal` toaster; this component mirrors it into a signal and
//! schedules removal of dismissed toasts.

use chrono::Utc;
use gloo_timers::callback::Timeout;
use leptos::*;
use resume_portal::{Toast, ToastAction, ToastId, ToastVariant, Toaster as ToastQueue};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Toast notification surface
#[component]
pub fn Toaster(queue: ToastQueue) -> impl IntoView {
    let toasts = create_rw_signal(queue.toasts());
    let scheduled: Rc<RefCell<HashSet<ToastId>>> = Rc::default();

    let listener = {
        let queue = queue.clone();
        queue.clone().subscribe(move |snapshot: &[Toast]| {
            toasts.set(snapshot.to_vec());
            schedule_removals(&queue, snapshot, &scheduled);
        })
    };

    {
        let queue = queue.clone();
        on_cleanup(move || queue.unsubscribe(listener));
    }

    view! {
        <div class="fixed bottom-4 right-4 z-50 space-y-2" role="region" aria-label="Notifications">
            <For
                each=move || toasts.get()
                key=|toast| (toast.id, toast.open)
                children=move |toast| {
                    let queue = queue.clone();
                    view! { <ToastMessage toast=toast queue=queue /> }
                }
            />
        </div>
    }
}

/// Arm one timer per dismissed toast
fn schedule_removals(queue: &ToastQueue, snapshot: &[Toast], scheduled: &Rc<RefCell<HashSet<ToastId>>>) {
    let now = Utc::now();
    for toast in snapshot {
        let Some(remove_at) = toast.remove_at else {
            continue;
        };
        if !scheduled.borrow_mut().insert(toast.id) {
            continue;
        }

        let delay = (remove_at - now).num_milliseconds().clamp(0, u32::MAX as i64) as u32;
        let queue = queue.clone();
        let scheduled = Rc::clone(scheduled);
        let id = toast.id;
        Timeout::new(delay, move || {
            scheduled.borrow_mut().remove(&id);
            queue.remove_expired(Utc::now());
        })
        .forget();
    }
}

#[component]
fn ToastMessage(toast: Toast, queue: ToastQueue) -> impl IntoView {
    let bg_class = match toast.content.variant {
        ToastVariant::Default => "bg-gray-800 border border-gray-700",
        ToastVariant::Destructive => "bg-red-600",
    };
    let state = if toast.open { "open" } else { "closed" };
    let id = toast.id;

    view! {
        <div
            class=format!(
                "flex items-start space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg \
                 transition-all duration-300 ease-out",
                bg_class
            )
            data-state=state
            class:hidden=!toast.open
        >
            <div class="flex-1">
                <p class="text-sm font-semibold">{toast.content.title.clone()}</p>
                {toast.content.description.clone().map(|text| view! {
                    <p class="text-sm opacity-90">{text}</p>
                })}
            </div>
            <button
                class="text-sm opacity-70 hover:opacity-100"
                aria-label="Close"
                on:click=move |_| {
                    queue.dispatch(ToastAction::Dismiss(Some(id)));
                }
            >
                "✕"
            </button>
        </div>
    }
}
