//! Caller-supplied query criteria
//!
//! These types are built per request from already-parsed input and discarded
//! once the query completes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::claim::{ClaimField, ClaimStatus};

/// A categorical filter value: either one value or an explicit set
///
/// The two forms compile differently. `One` becomes an equality test and
/// `Many` becomes set membership, even when the set holds a single element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Number of values carried
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the carried values
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let slice = match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values.as_slice(),
        };
        slice.iter()
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(value: T) -> Self {
        OneOrMany::One(value)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        OneOrMany::Many(values)
    }
}

/// Sparse set of optional predicates over claim records
///
/// Every field left as `None` is absent from the compiled query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Exact claim number
    pub claim: Option<i64>,
    /// Exact member number
    pub member_no: Option<i64>,
    /// Exact episode id
    pub episode_id: Option<i64>,
    pub hospital: Option<OneOrMany<String>>,
    pub status: Option<OneOrMany<ClaimStatus>>,
    pub claim_type: Option<OneOrMany<String>>,
    pub contract_type: Option<OneOrMany<String>>,
    /// Case-insensitive substring of the provider name
    pub provider: Option<String>,
    /// Inclusive lower cost bound
    pub cost_from: Option<Decimal>,
    /// Inclusive upper cost bound
    pub cost_to: Option<Decimal>,
    /// Inclusive lower service-date bound, as RFC 3339 or `YYYY-MM-DD`
    pub service_date_from: Option<String>,
    /// Inclusive upper service-date bound, as RFC 3339 or `YYYY-MM-DD`
    pub service_date_to: Option<String>,
}

impl FilterSpec {
    /// Creates an empty filter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one hospital, compiled as equality
    pub fn hospital(mut self, hospital: impl Into<String>) -> Self {
        self.hospital = Some(OneOrMany::One(hospital.into()));
        self
    }

    /// Restricts to a set of hospitals, compiled as membership
    pub fn hospitals<I, S>(mut self, hospitals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hospital = Some(OneOrMany::Many(hospitals.into_iter().map(Into::into).collect()));
        self
    }

    /// Restricts to one status, compiled as equality
    pub fn status(mut self, status: ClaimStatus) -> Self {
        self.status = Some(OneOrMany::One(status));
        self
    }

    /// Restricts to a set of statuses, compiled as membership
    pub fn statuses(mut self, statuses: impl IntoIterator<Item = ClaimStatus>) -> Self {
        self.status = Some(OneOrMany::Many(statuses.into_iter().collect()));
        self
    }

    /// Restricts to providers whose name contains `provider`
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Restricts cost to the given inclusive bounds
    pub fn cost_between(mut self, from: Option<Decimal>, to: Option<Decimal>) -> Self {
        self.cost_from = from;
        self.cost_to = to;
        self
    }

    /// Restricts the service date to the given inclusive bounds
    pub fn service_date_between(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.service_date_from = from.map(str::to_string);
        self.service_date_to = to.map(str::to_string);
        self
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Maps caller text to a direction: `"asc"` is ascending, anything else
    /// (including `"desc"`) is descending
    pub fn parse(text: &str) -> Self {
        if text == "asc" {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    /// The storage engine's numeric direction
    pub fn as_i32(&self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

/// Requested ordering: one field and one direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to order by; `None` falls back to the service date
    pub field: Option<ClaimField>,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: ClaimField, order: SortOrder) -> Self {
        Self {
            field: Some(field),
            order,
        }
    }

    pub fn asc(field: ClaimField) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    pub fn desc(field: ClaimField) -> Self {
        Self::new(field, SortOrder::Desc)
    }
}
