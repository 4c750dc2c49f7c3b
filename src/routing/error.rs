//! Routing error types
//!
//! Pattern syntax errors surface when a route is declared; table-level
//! problems surface when a [`Router`](super::Router) is built from the table.

use thiserror::Error;

/// Errors raised while parsing a route pattern
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Patterns are absolute paths
    #[error("Route pattern must start with '/': {0:?}")]
    MissingLeadingSlash(String),

    /// `//` inside a pattern
    #[error("Route pattern has an empty segment: {0:?}")]
    EmptySegment(String),

    /// Parameter names follow identifier rules
    #[error("Invalid parameter name {name:?} in route pattern {pattern:?}")]
    InvalidParamName { pattern: String, name: String },

    /// The same parameter declared twice
    #[error("Parameter {name:?} declared twice in route pattern {pattern:?}")]
    DuplicateParam { pattern: String, name: String },

    /// `*` anywhere but the final segment
    #[error("Wildcard must be the last segment of route pattern {0:?}")]
    MisplacedWildcard(String),

    /// Generated expression failed to compile
    #[error("Route pattern {pattern:?} failed to compile: {error}")]
    Compile { pattern: String, error: String },
}

/// Route table configuration errors
///
/// These are programming errors in the route declarations and are reported
/// before anything renders.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteConfigError {
    /// No catch-all entry was declared
    #[error("Route table has no fallback entry")]
    MissingFallback,

    /// More than one catch-all entry
    #[error("Route table declares {0} fallback entries, expected exactly one")]
    MultipleFallbacks(usize),

    /// Two non-fallback entries claim the same paths
    #[error("Route {second:?} is ambiguous with earlier route {first:?}")]
    AmbiguousRoute { first: String, second: String },
}

/// Result type for pattern parsing
pub type PatternResult<T> = Result<T, PatternError>;
