//! Database error types
//!
//! This module defines the errors raised by the MongoDB adapter and their
//! translation into [`PortError`] at the port boundary.

use mongodb::error::ErrorKind;
use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The client settings are invalid
    #[error("Invalid database configuration: {0}")]
    Configuration(String),

    /// No server could be reached
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// The server rejected or failed an operation
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored document does not have the expected shape
    #[error("Failed to decode document: {0}")]
    Decode(String),
}

impl DatabaseError {
    /// Creates a decode error naming the offending document
    pub fn decode(id: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        DatabaseError::Decode(format!("document '{}': {}", id, reason))
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, DatabaseError::Configuration(_))
    }

    /// Translates the error for the port boundary
    ///
    /// # Arguments
    ///
    /// * `operation` - The storage operation that failed, e.g. "aggregate"
    pub fn into_port_error(self, operation: &str) -> PortError {
        match self {
            DatabaseError::Configuration(message) => PortError::configuration(message),
            DatabaseError::ConnectionFailed(message) => PortError::Connection {
                message,
                source: None,
            },
            DatabaseError::QueryFailed(message) => PortError::query(operation, message),
            DatabaseError::Decode(message) => PortError::transformation(message),
        }
    }
}

/// Classifies driver errors by their kind
impl From<mongodb::error::Error> for DatabaseError {
    fn from(error: mongodb::error::Error) -> Self {
        let message = error.to_string();
        match *error.kind {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(..)
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::Authentication { .. } => DatabaseError::ConnectionFailed(message),
            ErrorKind::InvalidArgument { .. } => DatabaseError::Configuration(message),
            ErrorKind::BsonDeserialization(..) => DatabaseError::Decode(message),
            _ => DatabaseError::QueryFailed(message),
        }
    }
}

impl From<bson::de::Error> for DatabaseError {
    fn from(error: bson::de::Error) -> Self {
        DatabaseError::Decode(error.to_string())
    }
}
