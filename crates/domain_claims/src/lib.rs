//! Claims Explorer Domain
//!
//! This crate implements the query side of the medical claims dashboard:
//! turning filter, sort, search, and page requests into storage pipelines
//! and returning consistent page envelopes.
//!
//! # Query Flow
//!
//! ```text
//! FilterSpec + search ──> compile_filters ──┐
//! SortSpec ────────────> compile_sort ──────┼──> build_pipeline ──> [Match, Sort, Skip, Limit]
//! PageParams ──────────> skip / limit ──────┘
//! ```
//!
//! The count behind `totalCount` is always computed from the same compiled
//! filter as the row window.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_claims::{ClaimsQueryService, ClaimsServiceConfig, FilterSpec};
//! use core_kernel::PageParams;
//!
//! let service = ClaimsQueryService::new(provider, ClaimsServiceConfig::default());
//! let page = service
//!     .list_claims(PageParams::new(1, 25), &FilterSpec::new().hospital("Calvary"), None, "")
//!     .await?;
//! ```

pub mod claim;
pub mod criteria;
pub mod query;
pub mod ports;
pub mod service;
pub mod export;
pub mod error;

pub use claim::{ClaimRecord, ClaimStatus, ClaimField, Sex};
pub use criteria::{FilterSpec, OneOrMany, SortSpec, SortOrder};
pub use query::{build_pipeline, compile_filters, compile_sort, Filter, Predicate, SortStage, Stage, Value};
pub use ports::{ClaimsCollection, CollectionProvider};
pub use service::{ClaimsQueryService, ClaimsServiceConfig, FilterOptions, DEFAULT_COLLECTION};
pub use export::ExportService;
pub use error::ClaimError;
#[cfg(any(test, feature = "mock"))]
pub use ports::memory::{InMemoryClaimsStore, InMemoryClaimsCollection, FailPoint};
