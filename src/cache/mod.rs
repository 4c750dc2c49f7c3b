//! Data Cache
//!
//! Session-scoped cache of asynchronous query results shared by every page.

pub mod client;
pub mod error;

pub use client::{QueryClient, QueryKey, QueryOptions, QueryState, QueryStatus, MAX_RETRY};
pub use error::{QueryError, QueryResult, UnauthorizedBehavior};
