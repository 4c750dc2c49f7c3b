//! Application startup errors

use thiserror::Error;

use crate::cache::QueryError;
use crate::config::ConfigError;
use crate::routing::{PatternError, RouteConfigError};

/// Errors that abort application startup.
///
/// None of these leave a partially initialized application behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration rejected before anything was built
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Query client could not be constructed
    #[error("Failed to construct query client: {0}")]
    QueryClient(#[source] QueryError),

    /// A route pattern failed to parse
    #[error("Invalid route pattern: {0}")]
    Pattern(#[from] PatternError),

    /// The route table is misconfigured
    #[error("Invalid route table: {0}")]
    Routes(#[from] RouteConfigError),
}

/// Result type for application startup
pub type AppResult<T> = Result<T, AppError>;
