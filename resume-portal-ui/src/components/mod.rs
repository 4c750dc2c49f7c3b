//! UI Components
//!
//! Reusable Leptos components shared by the pages.

pub mod loading;
pub mod nav;
pub mod toaster;
pub mod tooltip;

pub use loading::{LoadingOverlay, SectionSkeleton};
pub use nav::Nav;
pub use toaster::Toaster;
pub use tooltip::Tooltip;
