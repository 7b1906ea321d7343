//! Export service
//!
//! Fetches every claim matching the criteria, in the requested order, for
//! download. Serialisation of the rows is left to the caller.

use std::sync::Arc;

use tracing::info;

use core_kernel::PortError;

use crate::claim::ClaimRecord;
use crate::criteria::{FilterSpec, SortSpec};
use crate::ports::CollectionProvider;
use crate::query::build_pipeline;
use crate::service::ClaimsServiceConfig;

/// Runs unpaginated claim queries
#[derive(Clone)]
pub struct ExportService {
    provider: Arc<dyn CollectionProvider>,
    config: ClaimsServiceConfig,
}

impl ExportService {
    pub fn new(provider: Arc<dyn CollectionProvider>, config: ClaimsServiceConfig) -> Self {
        Self { provider, config }
    }

    /// Returns all matching claims in one shot
    ///
    /// Uses the same filter and sort compilation as
    /// [`ClaimsQueryService::list_claims`](crate::service::ClaimsQueryService::list_claims)
    /// with no skip or limit stage.
    pub async fn export_claims(
        &self,
        filters: &FilterSpec,
        sort: Option<&SortSpec>,
        search: &str,
    ) -> Result<Vec<ClaimRecord>, PortError> {
        let stages = build_pipeline(filters, sort, 0, 0, search);
        let rows = self
            .provider
            .collection(&self.config.collection)?
            .run_pipeline(&stages)
            .await?;

        info!(rows = rows.len(), "Exported claims");
        Ok(rows)
    }
}
