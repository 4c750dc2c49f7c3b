//! Ambient Providers
//!
//! Contexts established by the application root for every view:
//! the tooltip context, the notification surface and the animation lifecycle.

pub mod animation;
pub mod toast;
pub mod tooltip;

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use thiserror::Error;

pub use animation::{AnimationHook, AnimationLifecycle, NoopAnimations};
pub use toast::{
    ListenerId, Toast, ToastAction, ToastContent, ToastHandle, ToastId, ToastSettings, Toaster,
    ToastVariant,
};
pub use tooltip::{TooltipId, TooltipPhase, TooltipProvider, TooltipSettings};

/// Provider layers of the application, outermost first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    QueryClient,
    Tooltip,
    Toaster,
}

impl ProviderKind {
    /// Establishment order
    pub const ORDER: [ProviderKind; 3] = [
        ProviderKind::QueryClient,
        ProviderKind::Tooltip,
        ProviderKind::Toaster,
    ];
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::QueryClient => "query client provider",
            ProviderKind::Tooltip => "tooltip provider",
            ProviderKind::Toaster => "toaster",
        };
        f.write_str(name)
    }
}

/// Errors from using a provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Context used outside (or after) its provider
    #[error("{0} is not mounted")]
    NotMounted(ProviderKind),

    /// Tooltip id never registered, or already unregistered
    #[error("Unknown tooltip trigger: {0}")]
    UnknownTooltip(u64),
}

/// `at` plus `ms` milliseconds, saturating at the latest representable time
pub(crate) fn after_ms(at: DateTime<Utc>, ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(Duration::try_milliseconds)
        .and_then(|delay| at.checked_add_signed(delay))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
