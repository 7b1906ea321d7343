//! Ports and Adapters Infrastructure
//!
//! This module provides the foundational types for the hexagonal architecture
//! (ports and adapters) used by the claims explorer.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Application Layer                        │
//! │        (ClaimsQueryService / ExportService / handlers)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Port Traits                             │
//! │         (CollectionProvider, ClaimsCollection)               │
//! │   Defined in the domain crate, depend only on core_kernel    │
//! └─────────────────────────────────────────────────────────────┘
//!                    ▲                         ▲
//!                    │                         │
//!         ┌─────────┴─────────┐     ┌────────┴────────┐
//!         │  MongoDB Adapter  │     │ In-memory Adapter│
//!         │    (infra_db)     │     │     (tests)      │
//!         └───────────────────┘     └──────────────────┘
//! ```
//!
//! # Usage
//!
//! Each domain defines its own port trait that extends [`DomainPort`].
//! Adapters implement these traits and translate their native errors into
//! [`PortError`].
//!
//! ```rust,ignore
//! #[async_trait]
//! pub trait ClaimsCollection: DomainPort {
//!     async fn count(&self, filter: &Filter) -> Result<u64, PortError>;
//! }
//!
//! // In infra_db
//! impl ClaimsCollection for MongoClaimsCollection { ... }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for port operations
///
/// Provides a unified error type that all port implementations must use,
/// so services can propagate storage failures unchanged regardless of the
/// adapter behind the port.
#[derive(Debug, Error)]
pub enum PortError {
    /// The adapter is misconfigured or its backing system cannot be reached
    /// at construction time
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
    },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A storage operation failed
    #[error("Query failed during {operation}: {message}")]
    Query {
        operation: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A stored record could not be converted into the domain model
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },
}

impl PortError {
    /// Creates a Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        PortError::Configuration {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Query error for the named operation
    pub fn query(operation: impl Into<String>, message: impl Into<String>) -> Self {
        PortError::Query {
            operation: operation.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates the backing system is unavailable
    pub fn is_unavailable(&self) -> bool {
        matches!(self, PortError::Connection { .. })
    }

    /// Returns true if this error is a configuration problem
    pub fn is_configuration(&self) -> bool {
        matches!(self, PortError::Configuration { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits should extend this marker to ensure they are
/// thread-safe and can be used in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    /// Adapter is healthy and operational
    Healthy,
    /// Adapter is unhealthy and not operational
    Unhealthy,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthCheckResult {
    /// Returns true when the adapter reported itself healthy
    pub fn is_healthy(&self) -> bool {
        self.status == AdapterHealth::Healthy
    }
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    ///
    /// # Returns
    ///
    /// A `HealthCheckResult` indicating the current health status
    async fn health_check(&self) -> HealthCheckResult;
}
