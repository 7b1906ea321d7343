//! Query construction
//!
//! Pure compilers that turn caller criteria into an engine-agnostic stage
//! list, plus an evaluator used by in-memory adapters.

pub mod predicate;
pub mod filter;
pub mod sort;
pub mod pipeline;
pub mod eval;

pub use predicate::{Filter, Predicate, Value};
pub use filter::{compile_filters, escape_regex, parse_date_bound, search_predicate, SEARCH_FIELDS};
pub use sort::{compile_sort, SortStage, DEFAULT_SORT_FIELD};
pub use pipeline::{build_pipeline, is_paginated, Stage};
pub use eval::{apply_pipeline, matches};
