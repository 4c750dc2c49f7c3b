//! Tooltip Context
//!
//! Shared open/delay state for every tooltip-bearing control. At most one
//! tooltip is open. Hovering a trigger opens its tooltip after
//! `delay_duration_ms`, unless a tooltip was open within the last
//! `skip_delay_duration_ms`, in which case it opens immediately.

use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::rc::Rc;

use super::{after_ms, ProviderError, ProviderKind};

/// Identifier of a registered tooltip trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TooltipId(u64);

/// Timing settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipSettings {
    pub delay_duration_ms: u64,
    pub skip_delay_duration_ms: u64,
}

impl Default for TooltipSettings {
    fn default() -> Self {
        Self {
            delay_duration_ms: 700,
            skip_delay_duration_ms: 300,
        }
    }
}

/// Outcome of hovering a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipPhase {
    Open,
    /// Opens at the given instant unless the pointer leaves first
    Pending { open_at: DateTime<Utc> },
}

#[derive(Debug, Default)]
struct TooltipState {
    mounted: bool,
    next_id: u64,
    registered: Vec<TooltipId>,
    open: Option<TooltipId>,
    pending: Option<(TooltipId, DateTime<Utc>)>,
    last_closed_at: Option<DateTime<Utc>>,
}

/// The tooltip context shared by all triggers
#[derive(Debug, Clone)]
pub struct TooltipProvider {
    state: Rc<RefCell<TooltipState>>,
    settings: TooltipSettings,
}

impl TooltipProvider {
    pub fn new(settings: TooltipSettings) -> Self {
        Self {
            state: Rc::new(RefCell::new(TooltipState {
                mounted: true,
                ..Default::default()
            })),
            settings,
        }
    }

    pub fn settings(&self) -> TooltipSettings {
        self.settings
    }

    /// Tear down the context; later calls fail with `NotMounted`
    pub fn unmount(&self) {
        let mut state = self.state.borrow_mut();
        state.mounted = false;
        state.open = None;
        state.pending = None;
        state.registered.clear();
    }

    pub fn is_mounted(&self) -> bool {
        self.state.borrow().mounted
    }

    /// Register a trigger
    pub fn register(&self) -> Result<TooltipId, ProviderError> {
        let mut state = self.mounted_state()?;
        state.next_id += 1;
        let id = TooltipId(state.next_id);
        state.registered.push(id);
        Ok(id)
    }

    /// Forget a trigger, closing it if open
    pub fn unregister(&self, id: TooltipId) {
        let mut state = self.state.borrow_mut();
        state.registered.retain(|r| *r != id);
        if state.open == Some(id) {
            state.open = None;
        }
        if state.pending.is_some_and(|(p, _)| p == id) {
            state.pending = None;
        }
    }

    /// Pointer entered a trigger at `now`
    pub fn pointer_enter(&self, id: TooltipId, now: DateTime<Utc>) -> Result<TooltipPhase, ProviderError> {
        let mut state = self.mounted_state()?;
        if !state.registered.contains(&id) {
            return Err(ProviderError::UnknownTooltip(id.0));
        }

        let skip_ms = self.settings.skip_delay_duration_ms;
        let recently_closed = state
            .last_closed_at
            .is_some_and(|closed| now < after_ms(closed, skip_ms));

        if state.open.is_some() || recently_closed || self.settings.delay_duration_ms == 0 {
            state.open = Some(id);
            state.pending = None;
            return Ok(TooltipPhase::Open);
        }

        let open_at = after_ms(now, self.settings.delay_duration_ms);
        state.pending = Some((id, open_at));
        Ok(TooltipPhase::Pending { open_at })
    }

    /// Pointer left a trigger at `now`
    pub fn pointer_leave(&self, id: TooltipId, now: DateTime<Utc>) -> Result<(), ProviderError> {
        let mut state = self.mounted_state()?;
        if state.pending.is_some_and(|(p, _)| p == id) {
            state.pending = None;
        }
        if state.open == Some(id) {
            state.open = None;
            state.last_closed_at = Some(now);
        }
        Ok(())
    }

    /// Promote a pending tooltip whose delay has elapsed
    pub fn tick(&self, now: DateTime<Utc>) -> Option<TooltipId> {
        let mut state = self.state.borrow_mut();
        match state.pending {
            Some((id, open_at)) if open_at <= now => {
                state.pending = None;
                state.open = Some(id);
                Some(id)
            }
            _ => None,
        }
    }

    pub fn open_tooltip(&self) -> Option<TooltipId> {
        self.state.borrow().open
    }

    pub fn is_open(&self, id: TooltipId) -> bool {
        self.open_tooltip() == Some(id)
    }

    fn mounted_state(&self) -> Result<std::cell::RefMut<'_, TooltipState>, ProviderError> {
        let state = self.state.borrow_mut();
        if !state.mounted {
            return Err(ProviderError::NotMounted(ProviderKind::Tooltip));
        }
        Ok(state)
    }
}

impl Default for TooltipProvider {
    fn default() -> Self {
        Self::new(TooltipSettings::default())
    }
}
