//! Path-based view routing
//!
//! - [`pattern`]: path templates compiled to matchers
//! - [`table`]: ordered route declarations and the validated [`Router`]
//! - [`location`]: the navigable address and an in-memory history

pub mod error;
pub mod location;
pub mod pattern;
pub mod table;

pub use error::{PatternError, PatternResult, RouteConfigError};
pub use location::{Location, MemoryHistory};
pub use pattern::{RouteParams, RoutePattern, WILDCARD_PARAM};
pub use table::{RouteEntry, RouteMatch, RouteTable, Router};
