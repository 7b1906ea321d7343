//! Pipeline builder
//!
//! Stage order is fixed: match, sort, skip, limit. Filtering ahead of
//! sorting and paging keeps the result correct and lets the storage engine
//! use its indexes.

use crate::criteria::{FilterSpec, SortSpec};
use crate::query::filter::compile_filters;
use crate::query::predicate::Filter;
use crate::query::sort::{compile_sort, SortStage};

/// One step of a query pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Keep only records matching the filter
    Match(Filter),
    /// Order the records
    Sort(SortStage),
    /// Drop the first `n` records
    Skip(u64),
    /// Keep at most `n` records
    Limit(u64),
}

/// Builds the ordered stage list for a query
///
/// The match stage is only present when the compiled filter has clauses and
/// the sort stage is always present. `skip == 0` emits no skip stage and
/// `limit == 0` emits no limit stage, which is how an unbounded export is
/// requested.
pub fn build_pipeline(
    filters: &FilterSpec,
    sort: Option<&SortSpec>,
    skip: u64,
    limit: u64,
    search: &str,
) -> Vec<Stage> {
    let mut stages = Vec::with_capacity(4);

    let filter = compile_filters(filters, search);
    if !filter.is_empty() {
        stages.push(Stage::Match(filter));
    }

    stages.push(Stage::Sort(compile_sort(sort)));

    if skip > 0 {
        stages.push(Stage::Skip(skip));
    }
    if limit > 0 {
        stages.push(Stage::Limit(limit));
    }

    stages
}

/// True when the stage list bounds the number of returned rows
pub fn is_paginated(stages: &[Stage]) -> bool {
    stages
        .iter()
        .any(|stage| matches!(stage, Stage::Skip(_) | Stage::Limit(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::ClaimField;
    use crate::criteria::SortOrder;
    use crate::query::predicate::{Predicate, Value};
    use rust_decimal_macros::dec;

    #[test]
    fn test_calvary_scenario() {
        let filters = FilterSpec::new()
            .hospitals(["Calvary"])
            .cost_between(Some(dec!(100)), Some(dec!(500)));
        let sort = SortSpec::asc(ClaimField::Cost);

        let stages = build_pipeline(&filters, Some(&sort), 20, 10, "");

        assert_eq!(
            stages,
            vec![
                Stage::Match(Filter::from_clauses(vec![
                    Predicate::member_of(ClaimField::Hospital, ["Calvary"]),
                    Predicate::Range {
                        field: ClaimField::Cost,
                        lower: Some(Value::Decimal(dec!(100))),
                        upper: Some(Value::Decimal(dec!(500))),
                    },
                ])),
                Stage::Sort(SortStage {
                    field: ClaimField::Cost,
                    direction: SortOrder::Asc,
                }),
                Stage::Skip(20),
                Stage::Limit(10),
            ]
        );
    }

    #[test]
    fn test_no_filters_only_sort() {
        let stages = build_pipeline(&FilterSpec::default(), None, 0, 0, "  ");
        assert_eq!(stages.len(), 1);
        assert!(matches!(stages[0], Stage::Sort(_)));
        assert!(!is_paginated(&stages));
    }

    #[test]
    fn test_first_page_has_no_skip() {
        let stages = build_pipeline(&FilterSpec::default(), None, 0, 25, "");
        assert_eq!(stages.last(), Some(&Stage::Limit(25)));
        assert!(!stages.iter().any(|s| matches!(s, Stage::Skip(_))));
    }
}
