//! Filter predicate compiler
//!
//! Translates a [`FilterSpec`] and the free-text search box into one
//! conjunctive [`Filter`]. Compilation is pure: the same input always yields
//! the same clauses in the same order.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

use crate::claim::ClaimField;
use crate::criteria::{FilterSpec, OneOrMany};
use crate::error::ClaimError;
use crate::query::predicate::{Filter, Predicate, Value};

/// Fields the free-text search is matched against
pub const SEARCH_FIELDS: [ClaimField; 5] = [
    ClaimField::Patient,
    ClaimField::Diagnosis,
    ClaimField::Provider,
    ClaimField::Hospital,
    ClaimField::Agreement,
];

/// Compiles filters and search text into a single conjunctive filter
///
/// Clause order: exact-match integers, categorical fields, provider
/// substring, cost range, service-date range, then the search disjunction.
/// Absent criteria contribute nothing, so no criteria at all yields
/// [`Filter::empty`].
pub fn compile_filters(filters: &FilterSpec, search: &str) -> Filter {
    let mut filter = Filter::empty();

    let exact = [
        (ClaimField::Claim, filters.claim),
        (ClaimField::MemberNo, filters.member_no),
        (ClaimField::EpisodeId, filters.episode_id),
    ];
    for (field, value) in exact {
        if let Some(value) = value {
            filter.push(Predicate::equals(field, value));
        }
    }

    let text = |s: &String| Value::Text(s.clone());
    let categorical = [
        filters
            .hospital
            .as_ref()
            .and_then(|v| categorical(ClaimField::Hospital, v, text)),
        filters
            .status
            .as_ref()
            .and_then(|v| categorical(ClaimField::Status, v, |s| Value::from(s.as_str()))),
        filters
            .claim_type
            .as_ref()
            .and_then(|v| categorical(ClaimField::ClaimType, v, text)),
        filters
            .contract_type
            .as_ref()
            .and_then(|v| categorical(ClaimField::ContractType, v, text)),
    ];
    for predicate in categorical.into_iter().flatten() {
        filter.push(predicate);
    }

    if let Some(provider) = filters.provider.as_deref().filter(|p| !p.is_empty()) {
        filter.push(Predicate::RegexContains {
            field: ClaimField::Provider,
            pattern: escape_regex(provider),
        });
    }

    if filters.cost_from.is_some() || filters.cost_to.is_some() {
        filter.push(Predicate::Range {
            field: ClaimField::Cost,
            lower: filters.cost_from.map(Value::Decimal),
            upper: filters.cost_to.map(Value::Decimal),
        });
    }

    let date_from = date_bound("service_date_from", filters.service_date_from.as_deref());
    let date_to = date_bound("service_date_to", filters.service_date_to.as_deref());
    if date_from.is_some() || date_to.is_some() {
        filter.push(Predicate::Range {
            field: ClaimField::ServiceDate,
            lower: date_from.map(Value::Date),
            upper: date_to.map(Value::Date),
        });
    }

    if let Some(search) = search_predicate(search) {
        filter.push(search);
    }

    filter
}

/// Builds the free-text disjunction, or `None` when the text is blank
pub fn search_predicate(search: &str) -> Option<Predicate> {
    if search.trim().is_empty() {
        return None;
    }
    let pattern = escape_regex(search);
    Some(Predicate::Or(
        SEARCH_FIELDS
            .into_iter()
            .map(|field| Predicate::RegexContains {
                field,
                pattern: pattern.clone(),
            })
            .collect(),
    ))
}

/// Escapes regex metacharacters so `input` matches literally
///
/// Escapes exactly `. * + ? ^ $ { } ( ) | [ ] \`.
pub fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() * 2);
    for c in input.chars() {
        if matches!(
            c,
            '.' | '*' | '+' | '?' | '^' | '$' | '{' | '}' | '(' | ')' | '|' | '[' | ']' | '\\'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Parses an external date bound
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM:SS` (taken as UTC) and
/// bare `YYYY-MM-DD` dates (UTC midnight).
pub fn parse_date_bound(input: &str) -> Result<DateTime<Utc>, ClaimError> {
    let input = input.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ClaimError::InvalidDate(input.to_string()))
}

fn date_bound(name: &str, input: Option<&str>) -> Option<DateTime<Utc>> {
    let input = input.filter(|s| !s.trim().is_empty())?;
    match parse_date_bound(input) {
        Ok(date) => Some(date),
        Err(e) => {
            debug!(bound = name, error = %e, "Ignoring service date bound");
            None
        }
    }
}

fn categorical<T>(
    field: ClaimField,
    value: &OneOrMany<T>,
    to_value: impl Fn(&T) -> Value,
) -> Option<Predicate> {
    match value {
        OneOrMany::One(v) => match to_value(v) {
            Value::Text(s) if s.is_empty() => None,
            v => Some(Predicate::Equals { field, value: v }),
        },
        OneOrMany::Many(values) if values.is_empty() => None,
        OneOrMany::Many(values) => Some(Predicate::MemberOf {
            field,
            values: values.iter().map(to_value).collect(),
        }),
    }
}
