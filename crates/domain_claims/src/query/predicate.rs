//! Engine-agnostic predicate model
//!
//! A [`Filter`] is the conjunction of its [`Predicate`] clauses. Storage
//! adapters walk the clauses to render a native query; the in-memory adapter
//! evaluates them directly.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::claim::ClaimField;

/// A scalar compared against a claim attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Text(String),
    Decimal(Decimal),
    Date(DateTime<Utc>),
}

impl Value {
    /// Orders two values of compatible kinds; integers and decimals compare
    /// numerically, any other mix is unordered
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Decimal(b)) => Some(Decimal::from(*a).cmp(b)),
            (Value::Decimal(a), Value::Int(b)) => Some(a.cmp(&Decimal::from(*b))),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

/// One constraint over a claim attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field == value`
    Equals { field: ClaimField, value: Value },
    /// `field ∈ values`
    MemberOf { field: ClaimField, values: Vec<Value> },
    /// Case-insensitive match of an already escaped pattern
    RegexContains { field: ClaimField, pattern: String },
    /// Inclusive range; a missing bound leaves that side open
    Range {
        field: ClaimField,
        lower: Option<Value>,
        upper: Option<Value>,
    },
    /// Any branch matches
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn equals(field: ClaimField, value: impl Into<Value>) -> Self {
        Predicate::Equals {
            field,
            value: value.into(),
        }
    }

    pub fn member_of<V: Into<Value>>(field: ClaimField, values: impl IntoIterator<Item = V>) -> Self {
        Predicate::MemberOf {
            field,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The field constrained by this predicate, `None` for `Or`
    pub fn field(&self) -> Option<ClaimField> {
        match self {
            Predicate::Equals { field, .. }
            | Predicate::MemberOf { field, .. }
            | Predicate::RegexContains { field, .. }
            | Predicate::Range { field, .. } => Some(*field),
            Predicate::Or(_) => None,
        }
    }
}

/// Conjunction of predicates; empty means "match every record"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<Predicate>,
}

impl Filter {
    /// The always-true filter
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_clauses(clauses: Vec<Predicate>) -> Self {
        Self { clauses }
    }

    /// Appends one more conjunct
    pub fn push(&mut self, predicate: Predicate) {
        self.clauses.push(predicate);
    }

    pub fn clauses(&self) -> &[Predicate] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// First clause constraining `field`
    pub fn clause_for(&self, field: ClaimField) -> Option<&Predicate> {
        self.clauses.iter().find(|p| p.field() == Some(field))
    }
}
