//! Claims query service
//!
//! Runs compiled pipelines against the configured collection and assembles
//! page envelopes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use core_kernel::{PageParams, PageResult, PortError};

use crate::claim::{ClaimField, ClaimRecord};
use crate::criteria::{FilterSpec, SortSpec};
use crate::ports::{ClaimsCollection, CollectionProvider};
use crate::query::{build_pipeline, compile_filters};

/// Collection used when none is configured
pub const DEFAULT_COLLECTION: &str = "medical_claims";

/// Settings shared by the claims services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsServiceConfig {
    /// Name of the collection holding claim records
    pub collection: String,
}

impl ClaimsServiceConfig {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
        }
    }
}

impl Default for ClaimsServiceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTION)
    }
}

/// Distinct values offered by the filter drop-downs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub hospitals: Vec<String>,
    pub providers: Vec<String>,
    pub statuses: Vec<String>,
}

impl FilterOptions {
    /// Returns the options with every list in alphabetical order
    pub fn sorted(mut self) -> Self {
        self.hospitals.sort();
        self.providers.sort();
        self.statuses.sort();
        self
    }
}

/// Lists, counts, and describes claims
#[derive(Clone)]
pub struct ClaimsQueryService {
    provider: Arc<dyn CollectionProvider>,
    config: ClaimsServiceConfig,
}

impl ClaimsQueryService {
    /// Creates the service over a connection provider
    ///
    /// # Arguments
    ///
    /// * `provider` - Source of collection handles
    /// * `config` - Service settings, including the collection name
    pub fn new(provider: Arc<dyn CollectionProvider>, config: ClaimsServiceConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &ClaimsServiceConfig {
        &self.config
    }

    fn collection(&self) -> Result<Arc<dyn ClaimsCollection>, PortError> {
        self.provider.collection(&self.config.collection)
    }

    /// Returns one page of matching claims with pagination metadata
    ///
    /// The row window and the total count are fetched by two storage
    /// operations built from the same compiled filter. Unless the adapter
    /// binds them to one snapshot, `total_pages` is approximate while the
    /// collection is being written to. A failure in either operation fails
    /// the whole call; no partial envelope is ever returned.
    ///
    /// # Arguments
    ///
    /// * `params` - Clamped page number and size
    /// * `filters` - Field criteria
    /// * `sort` - Requested ordering, service date descending when `None`
    /// * `search` - Free-text search; blank means no search
    pub async fn list_claims(
        &self,
        params: PageParams,
        filters: &FilterSpec,
        sort: Option<&SortSpec>,
        search: &str,
    ) -> Result<PageResult<ClaimRecord>, PortError> {
        let skip = params.skip();
        let stages = build_pipeline(filters, sort, skip, params.limit(), search);
        let count_filter = compile_filters(filters, search);

        debug!(
            page = params.page(),
            limit = params.limit(),
            stages = stages.len(),
            clauses = count_filter.len(),
            "Listing claims"
        );

        let collection = self.collection()?;
        let (rows, total_count) = collection.fetch_page(&stages, &count_filter).await?;

        let result = PageResult::new(rows, total_count, params);
        info!(
            total_count = result.total_count,
            returned = result.data.len(),
            total_pages = result.total_pages,
            "Listed claims"
        );
        Ok(result)
    }

    /// Counts the claims matching the filters and search text
    pub async fn count_claims(&self, filters: &FilterSpec, search: &str) -> Result<u64, PortError> {
        let filter = compile_filters(filters, search);
        self.collection()?.count(&filter).await
    }

    /// Distinct hospitals, providers, and statuses over the whole collection
    ///
    /// No filter is applied. The three scans run concurrently.
    pub async fn distinct_options(&self) -> Result<FilterOptions, PortError> {
        let collection = self.collection()?;
        let (hospitals, providers, statuses) = futures::try_join!(
            collection.distinct_values(ClaimField::Hospital),
            collection.distinct_values(ClaimField::Provider),
            collection.distinct_values(ClaimField::Status),
        )?;

        debug!(
            hospitals = hospitals.len(),
            providers = providers.len(),
            statuses = statuses.len(),
            "Loaded filter options"
        );
        Ok(FilterOptions {
            hospitals,
            providers,
            statuses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_collection() {
        assert_eq!(ClaimsServiceConfig::default().collection, "medical_claims");
    }

    #[test]
    fn test_filter_options_sorted() {
        let options = FilterOptions {
            hospitals: vec!["St Vincent".into(), "Calvary".into()],
            providers: vec!["Zed".into(), "Amy".into()],
            statuses: vec!["Paid".into(), "Assessed".into()],
        }
        .sorted();

        assert_eq!(options.hospitals, vec!["Calvary", "St Vincent"]);
        assert_eq!(options.providers, vec!["Amy", "Zed"]);
        assert_eq!(options.statuses, vec!["Assessed", "Paid"]);
    }
}
