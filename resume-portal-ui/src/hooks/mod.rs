//! Hooks
//!
//! Global animation wiring and the shared-cache query hook.

pub mod animations;
pub mod query;

pub use animations::GlobalAnimations;
pub use query::use_query;
