//! Claims handlers

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use core_kernel::PageResult;
use domain_claims::{ClaimRecord, FilterOptions};

use crate::dto::claims::{render_csv, ClaimsQueryParams, ExportFormat};
use crate::{error::ApiError, AppState};

/// Lists one page of claims
pub async fn list_claims(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<PageResult<ClaimRecord>>, ApiError> {
    let params = ClaimsQueryParams::from_pairs(pairs);
    debug!(?params, "List claims request");

    let page = state
        .query_service
        .list_claims(params.page, &params.filters, Some(&params.sort), &params.search)
        .await?;
    Ok(Json(page))
}

/// Exports every matching claim as JSON or CSV
pub async fn export_claims(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let format = ExportFormat::from_pairs(&pairs)?;
    let params = ClaimsQueryParams::from_pairs(pairs);

    let rows = state
        .export_service
        .export_claims(&params.filters, Some(&params.sort), &params.search)
        .await?;

    let response = match format {
        ExportFormat::Json => Json(rows).into_response(),
        ExportFormat::Csv => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"claims.csv\""),
            ],
            render_csv(rows)?,
        )
            .into_response(),
    };
    Ok(response)
}

/// Distinct hospitals, providers and statuses for the filter drop-downs
pub async fn filter_options(
    State(state): State<AppState>,
) -> Result<Json<FilterOptions>, ApiError> {
    let options = state.query_service.distinct_options().await?;
    Ok(Json(options.sorted()))
}
