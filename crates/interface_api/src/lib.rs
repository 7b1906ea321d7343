//! HTTP API Layer
//!
//! This crate provides the REST API of the claims explorer using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Listing, export, filter options, and health checks
//! - **Middleware**: Request ids, tracing, audit logging
//! - **DTOs**: Query-string parsing and CSV rows
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(Arc::new(store), config.service_config());
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{http::HeaderName, middleware as axum_middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use domain_claims::{ClaimsQueryService, ClaimsServiceConfig, CollectionProvider, ExportService};

use crate::handlers::{claims, health};
use crate::middleware::{audit_middleware, REQUEST_ID_HEADER};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub query_service: ClaimsQueryService,
    pub export_service: ExportService,
    pub provider: Arc<dyn CollectionProvider>,
}

impl AppState {
    /// Builds both claims services over one connection provider
    pub fn new(provider: Arc<dyn CollectionProvider>, config: ClaimsServiceConfig) -> Self {
        Self {
            query_service: ClaimsQueryService::new(provider.clone(), config.clone()),
            export_service: ExportService::new(provider.clone(), config),
            provider,
        }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Services and the connection provider
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    // Public routes
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Claims routes
    let claims_routes = Router::new()
        .route("/", get(claims::list_claims))
        .route("/export", get(claims::export_claims))
        .route("/options", get(claims::filter_options));

    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .merge(health_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
