//! Core Kernel - Foundational types for the claims explorer
//!
//! This crate provides the building blocks shared by every other crate:
//! - Port error and health-check types for the ports and adapters pattern
//! - Page parameters and the page envelope returned by listing queries

pub mod ports;
pub mod pagination;

pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
pub use pagination::{PageParams, PageResult, total_pages, MAX_PAGE_LIMIT, DEFAULT_PAGE_LIMIT};
