//! Sort compiler

use crate::claim::ClaimField;
use crate::criteria::{SortOrder, SortSpec};

/// Field used when the caller does not choose one
pub const DEFAULT_SORT_FIELD: ClaimField = ClaimField::ServiceDate;

/// A single-key ordering stage
///
/// Rows with equal keys keep whatever order the storage engine yields, which
/// is not guaranteed to be stable across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortStage {
    pub field: ClaimField,
    pub direction: SortOrder,
}

/// Compiles the requested ordering, defaulting to service date descending
pub fn compile_sort(sort: Option<&SortSpec>) -> SortStage {
    match sort {
        Some(spec) => SortStage {
            field: spec.field.unwrap_or(DEFAULT_SORT_FIELD),
            direction: spec.order,
        },
        None => SortStage {
            field: DEFAULT_SORT_FIELD,
            direction: SortOrder::Desc,
        },
    }
}
