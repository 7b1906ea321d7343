//! Infrastructure Database Layer
//!
//! This crate provides the MongoDB side of the claims explorer: client
//! configuration, error translation, BSON rendering of compiled pipelines,
//! and the adapter implementing the claims ports.
//!
//! # Architecture
//!
//! The domain crate compiles requests into engine-agnostic [`Stage`] lists.
//! This crate renders them to aggregation documents, runs them through the
//! shared client, and decodes stored documents back into domain records.
//!
//! [`Stage`]: domain_claims::Stage
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseConfig, MongoClaimsStore};
//!
//! let store = MongoClaimsStore::connect(DatabaseConfig::from_env()?).await?;
//! let service = ClaimsQueryService::new(Arc::new(store), ClaimsServiceConfig::default());
//! ```

pub mod pool;
pub mod error;
pub mod document;
pub mod render;
pub mod adapters;

pub use pool::{create_client, DatabaseConfig, DEFAULT_DATABASE, DEFAULT_MAX_POOL_SIZE};
pub use error::DatabaseError;
pub use document::{decode_claim, ClaimDocument};
pub use render::{render_filter, render_pipeline};
pub use adapters::{MongoClaimsCollection, MongoClaimsStore};
