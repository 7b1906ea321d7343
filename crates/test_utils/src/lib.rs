//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims explorer test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built claim records and datasets
//! - `builders`: Builder pattern for claim record construction
//! - `database`: MongoDB test container and seeding helpers
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use generators::*;
