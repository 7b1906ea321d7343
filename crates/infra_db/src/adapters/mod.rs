//! Domain Adapters
//!
//! This module provides adapter implementations for the claims ports,
//! connecting the domain interfaces to MongoDB.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::MongoClaimsStore;
//! use domain_claims::CollectionProvider;
//!
//! let store = MongoClaimsStore::connect(config).await?;
//! let total = store.collection("medical_claims")?.count(&Filter::empty()).await?;
//! ```

pub mod mongo;

pub use mongo::{MongoClaimsCollection, MongoClaimsStore};
