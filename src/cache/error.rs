//! Query error types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors produced while fetching or configuring cached queries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Non-success HTTP status, rendered as `"{status}: {body}"`
    #[error("{status}: {body}")]
    Http { status: u16, body: String },

    /// Request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client options rejected at construction
    #[error("Invalid query client options: {0}")]
    InvalidOptions(String),
}

impl QueryError {
    /// Build an error from a failed response.
    ///
    /// An empty body falls back to the status text.
    pub fn from_status(status: u16, status_text: &str, body: &str) -> Self {
        let body = if body.trim().is_empty() {
            status_text.to_string()
        } else {
            body.to_string()
        };
        QueryError::Http { status, body }
    }

    /// Check a response status, passing 2xx through
    pub fn check_status(status: u16, status_text: &str, body: &str) -> QueryResult<()> {
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(Self::from_status(status, status_text, body))
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            QueryError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// What a query does when the server answers 401
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnauthorizedBehavior {
    /// Treat the response as "no data"
    ReturnNull,
    /// Surface the error to the caller
    #[default]
    Throw,
}

impl UnauthorizedBehavior {
    /// Apply the policy to a fetch result
    pub fn apply(self, result: QueryResult<Value>) -> QueryResult<Value> {
        match (self, result) {
            (UnauthorizedBehavior::ReturnNull, Err(e)) if e.is_unauthorized() => Ok(Value::Null),
            (_, result) => result,
        }
    }
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_formatting() {
        let err = QueryError::from_status(404, "Not Found", "");
        assert_eq!(err.to_string(), "404: Not Found");

        let err = QueryError::from_status(500, "Internal Server Error", "db down");
        assert_eq!(err.to_string(), "500: db down");
        assert!(QueryError::check_status(204, "No Content", "").is_ok());
    }

    #[test]
    fn test_unauthorized_behavior() {
        let unauthorized = || Err(QueryError::from_status(401, "Unauthorized", ""));

        assert_eq!(
            UnauthorizedBehavior::ReturnNull.apply(unauthorized()),
            Ok(Value::Null)
        );
        assert!(UnauthorizedBehavior::Throw.apply(unauthorized()).is_err());

        let forbidden = Err(QueryError::from_status(403, "Forbidden", ""));
        assert!(UnauthorizedBehavior::ReturnNull.apply(forbidden).is_err());
    }
}
