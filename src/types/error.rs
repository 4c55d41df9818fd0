//! Error types for query processing.
//!
//! Uses `thiserror` for ergonomic error definitions. Every failure in the
//! pipeline is surfaced as a structured `QueryError`; nothing panics past
//! the pipeline boundary.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Error type for all query pipeline operations.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Plan references a table absent from the store
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    /// Plan kind cannot be executed
    #[error("Unsupported query type")]
    UnsupportedQueryType,

    /// Runtime fault while evaluating a filter or aggregate
    #[error("Error executing query: {details}")]
    Execution { details: String },

    /// Aggregate over a table with no rows
    #[error("Cannot compute {op} over empty table '{table}'")]
    EmptyAggregate { op: String, table: String },

    /// Vocabulary produced an invalid cue pattern
    #[error("Invalid cue pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryError {
    /// Create an execution error with context.
    pub fn execution(details: impl Into<String>) -> Self {
        Self::Execution {
            details: details.into(),
        }
    }

    /// Create a configuration error with context.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = QueryError::TableNotFound("invoices".to_string());
        assert_eq!(err.to_string(), "Table 'invoices' not found");

        let err = QueryError::execution("field 'foo' missing");
        assert_eq!(err.to_string(), "Error executing query: field 'foo' missing");

        let err = QueryError::EmptyAggregate {
            op: "AVG".to_string(),
            table: "products".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot compute AVG over empty table 'products'");
    }
}
