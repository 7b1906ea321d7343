//! BSON rendering of compiled queries
//!
//! Walks the engine-agnostic [`Filter`] and [`Stage`] values and produces
//! MongoDB query and aggregation documents. Rendering is total: every
//! predicate has a native form.

use bson::{doc, Bson, Document};
use rust_decimal::prelude::ToPrimitive;

use domain_claims::{Filter, Predicate, SortStage, Stage, Value};

/// Renders a scalar, with decimals as doubles and dates as BSON datetimes
pub fn render_value(value: &Value) -> Bson {
    match value {
        Value::Int(n) => Bson::Int64(*n),
        Value::Text(s) => Bson::String(s.clone()),
        Value::Decimal(d) => Bson::Double(d.to_f64().unwrap_or_default()),
        Value::Date(d) => Bson::DateTime(bson::DateTime::from_chrono(*d)),
    }
}

/// Renders one clause as a single-key query document
pub fn render_predicate(predicate: &Predicate) -> Document {
    match predicate {
        Predicate::Equals { field, value } => doc! { field.as_str(): render_value(value) },
        Predicate::MemberOf { field, values } => {
            let values: Vec<Bson> = values.iter().map(render_value).collect();
            doc! { field.as_str(): { "$in": values } }
        }
        Predicate::RegexContains { field, pattern } => doc! {
            field.as_str(): { "$regex": pattern.as_str(), "$options": "i" }
        },
        Predicate::Range { field, lower, upper } => {
            let mut bounds = Document::new();
            if let Some(lower) = lower {
                bounds.insert("$gte", render_value(lower));
            }
            if let Some(upper) = upper {
                bounds.insert("$lte", render_value(upper));
            }
            doc! { field.as_str(): bounds }
        }
        Predicate::Or(branches) => {
            let branches: Vec<Document> = branches.iter().map(render_predicate).collect();
            doc! { "$or": branches }
        }
    }
}

/// Renders a conjunction as one query document
///
/// Clauses are merged into a single document while their keys are
/// distinct; otherwise they are wrapped in `$and`. The empty filter renders
/// as `{}`.
pub fn render_filter(filter: &Filter) -> Document {
    let clauses: Vec<Document> = filter.clauses().iter().map(render_predicate).collect();

    let mut merged = Document::new();
    let mut collided = false;
    for (key, value) in clauses.iter().flat_map(|clause| clause.iter()) {
        if merged.contains_key(key) {
            collided = true;
            break;
        }
        merged.insert(key.clone(), value.clone());
    }

    if collided {
        doc! { "$and": clauses }
    } else {
        merged
    }
}

pub fn render_sort(sort: &SortStage) -> Document {
    doc! { sort.field.as_str(): sort.direction.as_i32() }
}

/// Renders a stage list as an aggregation pipeline
pub fn render_pipeline(stages: &[Stage]) -> Vec<Document> {
    stages
        .iter()
        .map(|stage| match stage {
            Stage::Match(filter) => doc! { "$match": render_filter(filter) },
            Stage::Sort(sort) => doc! { "$sort": render_sort(sort) },
            Stage::Skip(n) => doc! { "$skip": to_i64(*n) },
            Stage::Limit(n) => doc! { "$limit": to_i64(*n) },
        })
        .collect()
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
