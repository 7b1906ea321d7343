//! Claims Domain Ports
//!
//! This module defines the storage interfaces the claims services depend on.
//! The services never create, pool, or close connections: they ask a
//! [`CollectionProvider`] for a [`ClaimsCollection`] handle per call.
//!
//! # Adapters
//!
//! - **MongoDB Adapter**: `infra_db::MongoClaimsStore`
//! - **In-memory Adapter**: [`memory::InMemoryClaimsStore`], for tests and demos
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_claims::ports::CollectionProvider;
//! use std::sync::Arc;
//!
//! let provider: Arc<dyn CollectionProvider> = Arc::new(MongoClaimsStore::connect(config).await?);
//! let claims = provider.collection("medical_claims")?;
//! let total = claims.count(&Filter::empty()).await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError};

use crate::claim::{ClaimField, ClaimRecord};
use crate::query::{Filter, Stage};

/// A handle on one collection of claim records
#[async_trait]
pub trait ClaimsCollection: DomainPort {
    /// Runs the stages in order and returns the resulting rows
    async fn run_pipeline(&self, stages: &[Stage]) -> Result<Vec<ClaimRecord>, PortError>;

    /// Counts the records matching `filter`, with no sort or paging applied
    async fn count(&self, filter: &Filter) -> Result<u64, PortError>;

    /// Distinct non-empty string values of `field` across the whole collection
    async fn distinct_values(&self, field: ClaimField) -> Result<Vec<String>, PortError>;

    /// Fetches a page of rows together with the total matching count
    ///
    /// The default runs the two operations concurrently and independently.
    /// They are not bound to one snapshot, so under concurrent writes the
    /// count may describe a slightly different collection state than the
    /// rows. Adapters that support snapshot reads may override this to bind
    /// both to the same view. Either operation failing fails the call.
    async fn fetch_page(
        &self,
        stages: &[Stage],
        filter: &Filter,
    ) -> Result<(Vec<ClaimRecord>, u64), PortError> {
        futures::try_join!(self.run_pipeline(stages), self.count(filter))
    }
}

/// Hands out collection handles
pub trait CollectionProvider: DomainPort + HealthCheckable {
    /// Returns a handle on the named collection
    fn collection(&self, name: &str) -> Result<Arc<dyn ClaimsCollection>, PortError>;
}

/// In-memory adapter for tests and local demos
///
/// Evaluates pipelines with [`crate::query::eval`], records every pipeline
/// and count it is asked to run, and can be told to fail an operation.
#[cfg(any(test, feature = "mock"))]
pub mod memory {
    use super::*;
    use std::collections::{BTreeSet, HashMap};

    use chrono::Utc;
    use core_kernel::{AdapterHealth, HealthCheckResult};
    use tokio::sync::RwLock;

    use crate::query::{apply_pipeline, matches, Value};

    /// Operation an [`InMemoryClaimsCollection`] should fail
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FailPoint {
        Pipeline,
        Count,
        Distinct,
    }

    /// One collection held in memory
    #[derive(Debug, Default)]
    pub struct InMemoryClaimsCollection {
        records: RwLock<Vec<ClaimRecord>>,
        pipelines: RwLock<Vec<Vec<Stage>>>,
        counts: RwLock<Vec<Filter>>,
        fail: RwLock<Option<FailPoint>>,
    }

    impl InMemoryClaimsCollection {
        pub fn new(records: Vec<ClaimRecord>) -> Self {
            Self {
                records: RwLock::new(records),
                ..Default::default()
            }
        }

        /// Appends records, as a concurrent writer would
        pub async fn insert(&self, records: impl IntoIterator<Item = ClaimRecord>) {
            self.records.write().await.extend(records);
        }

        /// Makes the given operation fail from now on
        pub async fn fail_on(&self, point: FailPoint) {
            *self.fail.write().await = Some(point);
        }

        /// Every stage list passed to `run_pipeline`, oldest first
        pub async fn recorded_pipelines(&self) -> Vec<Vec<Stage>> {
            self.pipelines.read().await.clone()
        }

        /// Every filter passed to `count`, oldest first
        pub async fn recorded_counts(&self) -> Vec<Filter> {
            self.counts.read().await.clone()
        }

        async fn check(&self, point: FailPoint, operation: &str) -> Result<(), PortError> {
            if *self.fail.read().await == Some(point) {
                return Err(PortError::query(operation, "injected failure"));
            }
            Ok(())
        }
    }

    impl DomainPort for InMemoryClaimsCollection {}

    #[async_trait]
    impl ClaimsCollection for InMemoryClaimsCollection {
        async fn run_pipeline(&self, stages: &[Stage]) -> Result<Vec<ClaimRecord>, PortError> {
            self.pipelines.write().await.push(stages.to_vec());
            self.check(FailPoint::Pipeline, "aggregate").await?;
            let records = self.records.read().await.clone();
            Ok(apply_pipeline(records, stages))
        }

        async fn count(&self, filter: &Filter) -> Result<u64, PortError> {
            self.counts.write().await.push(filter.clone());
            self.check(FailPoint::Count, "count_documents").await?;
            let records = self.records.read().await;
            Ok(records.iter().filter(|r| matches(r, filter)).count() as u64)
        }

        async fn distinct_values(&self, field: ClaimField) -> Result<Vec<String>, PortError> {
            self.check(FailPoint::Distinct, "distinct").await?;
            let records = self.records.read().await;
            let values: BTreeSet<String> = records
                .iter()
                .filter_map(|r| match r.value_of(field) {
                    Some(Value::Text(s)) if !s.is_empty() => Some(s),
                    _ => None,
                })
                .collect();
            Ok(values.into_iter().collect())
        }
    }

    /// Provider holding named in-memory collections
    ///
    /// Unknown names resolve to a fresh empty collection, as a document
    /// store would.
    #[derive(Debug, Default)]
    pub struct InMemoryClaimsStore {
        collections: HashMap<String, Arc<InMemoryClaimsCollection>>,
    }

    impl InMemoryClaimsStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Registers a collection pre-populated with `records`
        pub fn with_collection(mut self, name: impl Into<String>, records: Vec<ClaimRecord>) -> Self {
            self.collections
                .insert(name.into(), Arc::new(InMemoryClaimsCollection::new(records)));
            self
        }

        /// The concrete collection registered under `name`, for assertions
        pub fn handle(&self, name: &str) -> Option<Arc<InMemoryClaimsCollection>> {
            self.collections.get(name).cloned()
        }
    }

    impl DomainPort for InMemoryClaimsStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryClaimsStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "in-memory-claims-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("In-memory adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    impl CollectionProvider for InMemoryClaimsStore {
        fn collection(&self, name: &str) -> Result<Arc<dyn ClaimsCollection>, PortError> {
            let handle: Arc<dyn ClaimsCollection> = match self.collections.get(name) {
                Some(collection) => collection.clone(),
                None => Arc::new(InMemoryClaimsCollection::default()),
            };
            Ok(handle)
        }
    }
}
