//! MongoDB Claims Adapter
//!
//! This module provides the database adapter for the claims ports,
//! implementing `CollectionProvider` and `ClaimsCollection` on top of one
//! shared MongoDB client.
//!
//! # Overview
//!
//! - [`MongoClaimsStore`] owns the pooled client and hands out collection
//!   handles. Handles are cheap; the driver pool is shared.
//! - [`MongoClaimsCollection`] renders compiled stages to BSON, runs them
//!   and decodes the stored documents into domain records.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseConfig, MongoClaimsStore};
//! use domain_claims::CollectionProvider;
//! use std::sync::Arc;
//!
//! let store = MongoClaimsStore::connect(DatabaseConfig::from_env()?).await?;
//! let provider: Arc<dyn CollectionProvider> = Arc::new(store);
//! let claims = provider.collection("medical_claims")?;
//! ```

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::options::SessionOptions;
use mongodb::{Client, Collection, Database};
use tracing::{debug, instrument};

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_claims::{ClaimField, ClaimRecord, ClaimsCollection, CollectionProvider, Filter, Stage};

use crate::document::decode_claim;
use crate::error::DatabaseError;
use crate::pool::{create_client, DatabaseConfig};
use crate::render::{render_filter, render_pipeline};

const ADAPTER_ID: &str = "mongodb-claims-adapter";

/// MongoDB-backed collection provider
///
/// # Health Checking
///
/// The store implements `HealthCheckable` by sending `ping` to the
/// configured database.
#[derive(Debug, Clone)]
pub struct MongoClaimsStore {
    client: Client,
    database: Database,
    snapshot_reads: bool,
}

impl MongoClaimsStore {
    /// Wraps an existing client
    pub fn new(client: Client, config: &DatabaseConfig) -> Self {
        Self {
            database: client.database(&config.database),
            client,
            snapshot_reads: config.snapshot_reads,
        }
    }

    /// Creates the pooled client and wraps it
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Configuration` when the settings are invalid
    pub async fn connect(config: DatabaseConfig) -> Result<Self, DatabaseError> {
        let client = create_client(&config).await?;
        Ok(Self::new(client, &config))
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Verifies the server answers, for fail-fast start-up
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

impl DomainPort for MongoClaimsStore {}

#[async_trait]
impl HealthCheckable for MongoClaimsStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = self.ping().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(()) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
        };
        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

impl CollectionProvider for MongoClaimsStore {
    fn collection(&self, name: &str) -> Result<Arc<dyn ClaimsCollection>, PortError> {
        if name.trim().is_empty() {
            return Err(PortError::configuration("collection name is empty"));
        }
        Ok(Arc::new(MongoClaimsCollection {
            client: self.client.clone(),
            collection: self.database.collection::<Document>(name),
            snapshot_reads: self.snapshot_reads,
        }))
    }
}

/// Handle on one claims collection
#[derive(Debug, Clone)]
pub struct MongoClaimsCollection {
    client: Client,
    collection: Collection<Document>,
    snapshot_reads: bool,
}

impl MongoClaimsCollection {
    pub fn name(&self) -> &str {
        self.collection.name()
    }

    /// Reads rows and count inside one snapshot session
    async fn fetch_page_in_snapshot(
        &self,
        stages: &[Stage],
        filter: &Filter,
    ) -> Result<(Vec<ClaimRecord>, u64), PortError> {
        let options = SessionOptions::builder().snapshot(true).build();
        let mut session = self
            .client
            .start_session()
            .with_options(options)
            .await
            .map_err(|e| db_to_port_error("start_session", e.into()))?;

        let mut cursor = self
            .collection
            .aggregate(render_pipeline(stages))
            .session(&mut session)
            .await
            .map_err(|e| db_to_port_error("aggregate", e.into()))?;
        let documents: Vec<Document> = cursor
            .stream(&mut session)
            .try_collect()
            .await
            .map_err(|e| db_to_port_error("aggregate", e.into()))?;

        let total = self
            .collection
            .count_documents(render_filter(filter))
            .session(&mut session)
            .await
            .map_err(|e| db_to_port_error("count_documents", e.into()))?;

        Ok((decode_all(documents)?, total))
    }
}

impl DomainPort for MongoClaimsCollection {}

#[async_trait]
impl ClaimsCollection for MongoClaimsCollection {
    #[instrument(skip(self, stages), fields(collection = %self.name(), stages = stages.len()))]
    async fn run_pipeline(&self, stages: &[Stage]) -> Result<Vec<ClaimRecord>, PortError> {
        debug!("Running aggregation pipeline");

        let cursor = self
            .collection
            .aggregate(render_pipeline(stages))
            .await
            .map_err(|e| db_to_port_error("aggregate", e.into()))?;
        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| db_to_port_error("aggregate", e.into()))?;

        decode_all(documents)
    }

    #[instrument(skip(self, filter), fields(collection = %self.name(), clauses = filter.len()))]
    async fn count(&self, filter: &Filter) -> Result<u64, PortError> {
        debug!("Counting matching documents");

        self.collection
            .count_documents(render_filter(filter))
            .await
            .map_err(|e| db_to_port_error("count_documents", e.into()))
    }

    #[instrument(skip(self), fields(collection = %self.name()))]
    async fn distinct_values(&self, field: ClaimField) -> Result<Vec<String>, PortError> {
        debug!("Loading distinct values");

        let values = self
            .collection
            .distinct(field.as_str(), doc! {})
            .await
            .map_err(|e| db_to_port_error("distinct", e.into()))?;

        Ok(values
            .into_iter()
            .filter_map(|value| match value {
                Bson::String(s) if !s.is_empty() => Some(s),
                _ => None,
            })
            .collect())
    }

    #[instrument(skip(self, stages, filter), fields(collection = %self.name(), snapshot = self.snapshot_reads))]
    async fn fetch_page(
        &self,
        stages: &[Stage],
        filter: &Filter,
    ) -> Result<(Vec<ClaimRecord>, u64), PortError> {
        if self.snapshot_reads {
            self.fetch_page_in_snapshot(stages, filter).await
        } else {
            futures::try_join!(self.run_pipeline(stages), self.count(filter))
        }
    }
}

fn decode_all(documents: Vec<Document>) -> Result<Vec<ClaimRecord>, PortError> {
    documents
        .into_iter()
        .map(|document| decode_claim(document).map_err(|e| db_to_port_error("decode", e)))
        .collect()
}

/// Converts a database error to a port error
fn db_to_port_error(operation: &str, e: DatabaseError) -> PortError {
    e.into_port_error(operation)
}
