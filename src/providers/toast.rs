//! Notification Surface
//!
//! Toast queue driven by a small reducer. Views enqueue through a
//! [`ToastHandle`]; the surface renders whatever [`Toaster::toasts`] holds.
//! Notifications sent while the surface is not mounted are dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::after_ms;

/// Identifier assigned to each toast
pub type ToastId = u64;

/// Visual style of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

/// What a toast says
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToastContent {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub variant: ToastVariant,
}

impl ToastContent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn destructive(mut self) -> Self {
        self.variant = ToastVariant::Destructive;
        self
    }
}

/// A toast in the queue
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub content: ToastContent,
    /// False once dismissed; the toast stays until its removal time
    pub open: bool,
    pub remove_at: Option<DateTime<Utc>>,
}

/// Reducer actions
#[derive(Debug, Clone, PartialEq)]
pub enum ToastAction {
    Add(ToastContent),
    Update { id: ToastId, content: ToastContent },
    /// `None` dismisses every toast
    Dismiss(Option<ToastId>),
    /// `None` removes every toast
    Remove(Option<ToastId>),
}

/// Queue limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastSettings {
    /// Toasts shown at once; newest wins
    pub limit: usize,
    /// Delay between dismissal and removal
    pub remove_delay_ms: u64,
}

impl Default for ToastSettings {
    fn default() -> Self {
        Self {
            limit: 1,
            remove_delay_ms: 1_000_000,
        }
    }
}

type Listener = Rc<dyn Fn(&[Toast])>;

/// Listener registration token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

#[derive(Default)]
struct ToasterState {
    toasts: Vec<Toast>,
    next_id: ToastId,
    next_listener: u64,
    mounted: bool,
    listeners: Vec<(ListenerId, Listener)>,
}

/// The notification surface
#[derive(Clone)]
pub struct Toaster {
    state: Rc<RefCell<ToasterState>>,
    settings: ToastSettings,
}

impl Toaster {
    pub fn new(settings: ToastSettings) -> Self {
        Self {
            state: Rc::new(RefCell::new(ToasterState::default())),
            settings,
        }
    }

    pub fn settings(&self) -> ToastSettings {
        self.settings
    }

    /// Start accepting notifications
    pub fn mount(&self) {
        self.state.borrow_mut().mounted = true;
        tracing::debug!("toaster mounted");
    }

    /// Stop accepting notifications and drop the queue
    pub fn unmount(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.mounted = false;
            state.toasts.clear();
        }
        tracing::debug!("toaster unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.state.borrow().mounted
    }

    /// Handle given to views for enqueueing
    pub fn handle(&self) -> ToastHandle {
        ToastHandle {
            toaster: self.clone(),
        }
    }

    /// Current queue, newest first
    pub fn toasts(&self) -> Vec<Toast> {
        self.state.borrow().toasts.clone()
    }

    /// Register a callback run after every state change
    pub fn subscribe(&self, listener: impl Fn(&[Toast]) + 'static) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = ListenerId(state.next_listener);
        state.next_listener += 1;
        state.listeners.push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.state.borrow_mut().listeners.retain(|(l, _)| *l != id);
    }

    /// Apply an action at `now`.
    ///
    /// Returns the id of the added toast for [`ToastAction::Add`], or `None`
    /// when the surface is not mounted.
    pub fn dispatch_at(&self, action: ToastAction, now: DateTime<Utc>) -> Option<ToastId> {
        let (added, listeners, snapshot) = {
            let mut state = self.state.borrow_mut();
            if !state.mounted {
                tracing::debug!(?action, "toaster not mounted, dropping notification");
                return None;
            }
            let added = reduce(&mut state, action, now, self.settings);
            let listeners: Vec<Listener> = state.listeners.iter().map(|(_, l)| l.clone()).collect();
            (added, listeners, state.toasts.clone())
        };

        for listener in listeners {
            listener(&snapshot);
        }
        added
    }

    pub fn dispatch(&self, action: ToastAction) -> Option<ToastId> {
        self.dispatch_at(action, Utc::now())
    }

    /// Remove dismissed toasts whose removal time has passed
    pub fn remove_expired(&self, now: DateTime<Utc>) -> usize {
        let expired: Vec<ToastId> = self
            .state
            .borrow()
            .toasts
            .iter()
            .filter(|t| t.remove_at.is_some_and(|at| at <= now))
            .map(|t| t.id)
            .collect();

        for id in &expired {
            self.dispatch_at(ToastAction::Remove(Some(*id)), now);
        }
        expired.len()
    }
}

impl fmt::Debug for Toaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Toaster")
            .field("settings", &self.settings)
            .field("mounted", &state.mounted)
            .field("toasts", &state.toasts.len())
            .finish()
    }
}

fn reduce(
    state: &mut ToasterState,
    action: ToastAction,
    now: DateTime<Utc>,
    settings: ToastSettings,
) -> Option<ToastId> {
    match action {
        ToastAction::Add(content) => {
            state.next_id += 1;
            let id = state.next_id;
            state.toasts.insert(
                0,
                Toast {
                    id,
                    content,
                    open: true,
                    remove_at: None,
                },
            );
            state.toasts.truncate(settings.limit);
            Some(id)
        }
        ToastAction::Update { id, content } => {
            if let Some(toast) = state.toasts.iter_mut().find(|t| t.id == id) {
                toast.content = content;
            }
            None
        }
        ToastAction::Dismiss(target) => {
            let remove_at = after_ms(now, settings.remove_delay_ms);
            for toast in state.toasts.iter_mut() {
                if target.map_or(true, |id| id == toast.id) && toast.open {
                    toast.open = false;
                    toast.remove_at = Some(remove_at);
                }
            }
            None
        }
        ToastAction::Remove(Some(id)) => {
            state.toasts.retain(|t| t.id != id);
            None
        }
        ToastAction::Remove(None) => {
            state.toasts.clear();
            None
        }
    }
}

/// Enqueue-only view of the toaster, handed to pages
#[derive(Clone, Debug)]
pub struct ToastHandle {
    toaster: Toaster,
}

impl ToastHandle {
    /// Show a toast; `None` if the surface is not mounted
    pub fn toast(&self, content: ToastContent) -> Option<ToastId> {
        self.toaster.dispatch(ToastAction::Add(content))
    }

    pub fn update(&self, id: ToastId, content: ToastContent) {
        self.toaster.dispatch(ToastAction::Update { id, content });
    }

    pub fn dismiss(&self, id: Option<ToastId>) {
        self.toaster.dispatch(ToastAction::Dismiss(id));
    }
}
