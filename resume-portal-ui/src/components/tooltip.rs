//! Tooltip
//!
//! Hover tooltip driven by the shared tooltip context, so delays and the
//! skip window apply across every trigger on the page.

use chrono::Utc;
use gloo_timers::callback::Timeout;
use leptos::*;
use resume_portal::TooltipPhase;
use std::cell::RefCell;
use std::rc::Rc;

use crate::state::use_tooltip;

/// Wraps `children` and shows `label` while hovered
#[component]
pub fn Tooltip(#[prop(into)] label: String, children: Children) -> impl IntoView {
    let open = create_rw_signal(false);

    // Without a provider the trigger renders plainly
    let Ok(tooltip) = use_tooltip() else {
        return children().into_view();
    };
    let Ok(id) = tooltip.register() else {
        return children().into_view();
    };

    let timer: Rc<RefCell<Option<Timeout>>> = Rc::default();

    {
        let tooltip = tooltip.clone();
        let timer = Rc::clone(&timer);
        on_cleanup(move || {
            timer.borrow_mut().take();
            tooltip.unregister(id);
        });
    }

    let on_enter = {
        let tooltip = tooltip.clone();
        let timer = Rc::clone(&timer);
        move |_| match tooltip.pointer_enter(id, Utc::now()) {
            Ok(TooltipPhase::Open) => open.set(true),
            Ok(TooltipPhase::Pending { open_at }) => {
                let delay = (open_at - Utc::now()).num_milliseconds().max(0) as u32;
                let tooltip = tooltip.clone();
                *timer.borrow_mut() = Some(Timeout::new(delay, move || {
                    if tooltip.tick(Utc::now()) == Some(id) {
                        open.set(true);
                    }
                }));
            }
            Err(e) => logging::warn!("tooltip unavailable: {}", e),
        }
    };

    let on_leave = move |_| {
        timer.borrow_mut().take();
        let _ = tooltip.pointer_leave(id, Utc::now());
        open.set(false);
    };

    view! {
        <span class="relative inline-block" on:mouseenter=on_enter on:mouseleave=on_leave>
            {children()}
            <Show when=move || open.get()>
                <span
                    role="tooltip"
                    class="absolute z-40 left-1/2 -translate-x-1/2 -top-9 whitespace-nowrap \
                           rounded bg-gray-900 px-2 py-1 text-xs text-white shadow"
                >
                    {label.clone()}
                </span>
            </Show>
        </span>
    }
    .into_view()
}
