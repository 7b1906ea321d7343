//! In-process evaluation of filters and pipelines
//!
//! Mirrors document-store semantics closely enough for adapters that keep
//! claims in memory: unset attributes never satisfy a predicate, values of
//! different kinds never compare, and missing sort keys order first.

use std::cmp::Ordering;

use regex::RegexBuilder;

use crate::claim::ClaimRecord;
use crate::criteria::SortOrder;
use crate::query::pipeline::Stage;
use crate::query::predicate::{Filter, Predicate, Value};
use crate::query::sort::SortStage;

/// True when `record` satisfies every clause of `filter`
pub fn matches(record: &ClaimRecord, filter: &Filter) -> bool {
    filter.clauses().iter().all(|p| eval_predicate(record, p))
}

fn eval_predicate(record: &ClaimRecord, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Equals { field, value } => record.value_of(*field).is_some_and(|v| &v == value),
        Predicate::MemberOf { field, values } => record
            .value_of(*field)
            .is_some_and(|v| values.iter().any(|candidate| candidate == &v)),
        Predicate::RegexContains { field, pattern } => match record.value_of(*field) {
            Some(Value::Text(text)) => RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map(|re| re.is_match(&text))
                .unwrap_or(false),
            _ => false,
        },
        Predicate::Range { field, lower, upper } => {
            let Some(v) = record.value_of(*field) else {
                return false;
            };
            let above = lower.as_ref().map_or(true, |lo| {
                matches!(v.compare(lo), Some(Ordering::Greater | Ordering::Equal))
            });
            let below = upper.as_ref().map_or(true, |hi| {
                matches!(v.compare(hi), Some(Ordering::Less | Ordering::Equal))
            });
            above && below
        }
        Predicate::Or(branches) => branches.iter().any(|p| eval_predicate(record, p)),
    }
}

/// Runs `stages` over `records` in order
pub fn apply_pipeline(records: Vec<ClaimRecord>, stages: &[Stage]) -> Vec<ClaimRecord> {
    let mut rows = records;
    for stage in stages {
        rows = match stage {
            Stage::Match(filter) => rows.into_iter().filter(|r| matches(r, filter)).collect(),
            Stage::Sort(sort) => {
                rows.sort_by(|a, b| compare_records(a, b, sort));
                rows
            }
            Stage::Skip(n) => rows.into_iter().skip(to_usize(*n)).collect(),
            Stage::Limit(n) => rows.into_iter().take(to_usize(*n)).collect(),
        };
    }
    rows
}

fn compare_records(a: &ClaimRecord, b: &ClaimRecord, sort: &SortStage) -> Ordering {
    let ord = match (a.value_of(sort.field), b.value_of(sort.field)) {
        (Some(x), Some(y)) => x.compare(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    };
    match sort.direction {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    }
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}
