//! Global Animations
//!
//! Scroll reveal for every `[data-animate]` element: an IntersectionObserver
//! adds the reveal class once an element scrolls into view, and a
//! MutationObserver picks up elements added by later route changes.
//!
//! When animations are disabled (or the user prefers reduced motion) the
//! document is tagged with `data-animations="off"` and nothing is observed.

use resume_portal::{AnimationConfig, AnimationHook};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MutationObserver, MutationObserverInit,
};

const ANIMATE_SELECTOR: &str = "[data-animate]";
const OFF_ATTRIBUTE: &str = "data-animations";

struct Observers {
    intersection: IntersectionObserver,
    mutation: MutationObserver,
    // Kept alive for as long as the observers may call them
    _on_intersect: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
    _on_mutate: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

/// Browser implementation of the animation hook
pub struct GlobalAnimations {
    config: AnimationConfig,
    observers: Option<Observers>,
    disabled: bool,
}

impl GlobalAnimations {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            observers: None,
            disabled: false,
        }
    }

    fn prefers_reduced_motion() -> bool {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
            .map(|mql| mql.matches())
            .unwrap_or(false)
    }

    fn install(&self, document: &Document) -> Result<Observers, JsValue> {
        let reveal_class = self.config.reveal_class.clone();
        let on_intersect = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if entry.is_intersecting() {
                        let target = entry.target();
                        let _ = target.class_list().add_1(&reveal_class);
                        observer.unobserve(&target);
                    }
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(self.config.threshold));
        let intersection = IntersectionObserver::new_with_options(
            on_intersect.as_ref().unchecked_ref(),
            &options,
        )?;

        let scan_target = intersection.clone();
        let scan_document = document.clone();
        let reveal_class = self.config.reveal_class.clone();
        let on_mutate = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |_records: js_sys::Array, _observer: MutationObserver| {
                observe_pending(&scan_document, &scan_target, &reveal_class);
            },
        );
        let mutation = MutationObserver::new(on_mutate.as_ref().unchecked_ref())?;

        if let Some(body) = document.body() {
            let init = MutationObserverInit::new();
            init.set_child_list(true);
            init.set_subtree(true);
            mutation.observe_with_options(&body, &init)?;
        }

        observe_pending(document, &intersection, &self.config.reveal_class);

        Ok(Observers {
            intersection,
            mutation,
            _on_intersect: on_intersect,
            _on_mutate: on_mutate,
        })
    }
}

/// Observe every animated element not yet revealed
fn observe_pending(document: &Document, observer: &IntersectionObserver, reveal_class: &str) {
    let Ok(nodes) = document.query_selector_all(ANIMATE_SELECTOR) else {
        return;
    };
    for i in 0..nodes.length() {
        if let Some(element) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            if !element.class_list().contains(reveal_class) {
                observer.observe(&element);
            }
        }
    }
}

impl AnimationHook for GlobalAnimations {
    fn init(&mut self) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let reduced = self.config.respect_reduced_motion && Self::prefers_reduced_motion();
        if !self.config.enabled || reduced {
            if let Some(root) = document.document_element() {
                let _ = root.set_attribute(OFF_ATTRIBUTE, "off");
            }
            self.disabled = true;
            return;
        }

        match self.install(&document) {
            Ok(observers) => self.observers = Some(observers),
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to start animations: {:?}", e).into());
            }
        }
    }

    fn teardown(&mut self) {
        if let Some(observers) = self.observers.take() {
            observers.intersection.disconnect();
            observers.mutation.disconnect();
        }

        if self.disabled {
            if let Some(root) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.document_element())
            {
                let _ = root.remove_attribute(OFF_ATTRIBUTE);
            }
            self.disabled = false;
        }
    }
}
