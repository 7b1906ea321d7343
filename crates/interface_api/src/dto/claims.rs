//! Claims DTOs
//!
//! Query strings arrive as raw key/value pairs so that repeated keys and
//! `key[]` forms can be told apart from single values. Anything that fails
//! to parse is treated as absent rather than rejected.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use core_kernel::{PageParams, DEFAULT_PAGE_LIMIT};
use domain_claims::{ClaimField, ClaimRecord, ClaimStatus, FilterSpec, OneOrMany, SortOrder, SortSpec};

use crate::error::ApiError;

/// Raw query-string values grouped by key
#[derive(Debug, Default)]
struct QueryPairs {
    values: BTreeMap<String, Vec<String>>,
    bracketed: BTreeSet<String>,
}

impl QueryPairs {
    fn new(pairs: Vec<(String, String)>) -> Self {
        let mut grouped = Self::default();
        for (key, value) in pairs {
            let key = match key.strip_suffix("[]") {
                Some(base) => {
                    grouped.bracketed.insert(base.to_string());
                    base.to_string()
                }
                None => key,
            };
            grouped.values.entry(key).or_default().push(value);
        }
        grouped
    }

    /// First non-blank value of `key`
    fn first(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)?
            .iter()
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }

    fn parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.first(key).and_then(|v| v.parse().ok())
    }

    /// Single value, or the set form for repeated and `[]` keys
    fn one_or_many(&self, key: &str) -> Option<OneOrMany<String>> {
        let values: Vec<String> = self
            .values
            .get(key)?
            .iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();

        if self.bracketed.contains(key) || values.len() > 1 {
            Some(OneOrMany::Many(values))
        } else {
            values.into_iter().next().map(OneOrMany::One)
        }
    }
}

/// A parsed listing request
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimsQueryParams {
    pub page: PageParams,
    pub filters: FilterSpec,
    pub sort: SortSpec,
    pub search: String,
}

impl Default for ClaimsQueryParams {
    fn default() -> Self {
        Self {
            page: PageParams::default(),
            filters: FilterSpec::default(),
            sort: SortSpec::desc(ClaimField::ServiceDate),
            search: String::new(),
        }
    }
}

impl ClaimsQueryParams {
    /// Builds the request from URL query pairs
    ///
    /// Missing or non-numeric `page`/`limit` fall back to 1 and 25 before
    /// clamping. Unknown statuses, sort fields and unparseable numbers are
    /// dropped.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let query = QueryPairs::new(pairs);

        let page = PageParams::new(
            query.parsed("page").unwrap_or(1),
            query.parsed("limit").unwrap_or(DEFAULT_PAGE_LIMIT as i64),
        );

        let status = query.one_or_many("status").and_then(|value| match value {
            OneOrMany::One(s) => s.parse::<ClaimStatus>().ok().map(OneOrMany::One),
            OneOrMany::Many(values) => Some(OneOrMany::Many(
                values.iter().filter_map(|s| s.parse().ok()).collect(),
            )),
        });

        let filters = FilterSpec {
            claim: query.parsed("claim"),
            member_no: query.parsed("member_no"),
            episode_id: query.parsed("episode_id"),
            hospital: query.one_or_many("hospital"),
            status,
            claim_type: query.one_or_many("claim_type"),
            contract_type: query.one_or_many("contract_type"),
            provider: query.first("provider").map(str::to_string),
            cost_from: query.parsed::<Decimal>("cost_from"),
            cost_to: query.parsed::<Decimal>("cost_to"),
            service_date_from: query.first("service_date_from").map(str::to_string),
            service_date_to: query.first("service_date_to").map(str::to_string),
        };

        let sort = SortSpec {
            field: query
                .parsed::<ClaimField>("sort_field")
                .or(Some(ClaimField::ServiceDate)),
            order: query
                .first("sort_order")
                .map(SortOrder::parse)
                .unwrap_or_default(),
        };

        let search = query
            .values
            .get("search")
            .and_then(|v| v.first())
            .cloned()
            .unwrap_or_default();

        Self {
            page,
            filters,
            sort,
            search,
        }
    }
}

/// Download format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Reads `format` from the query pairs, JSON when absent
    ///
    /// `excel` and `xlsx` are served as CSV.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, ApiError> {
        let requested = pairs
            .iter()
            .find(|(key, _)| key == "format")
            .map(|(_, value)| value.trim().to_ascii_lowercase());

        match requested.as_deref() {
            None | Some("") | Some("json") => Ok(ExportFormat::Json),
            Some("csv") | Some("excel") | Some("xlsx") => Ok(ExportFormat::Csv),
            Some(other) => Err(ApiError::BadRequest(format!(
                "unsupported export format '{}'",
                other
            ))),
        }
    }
}

/// One claim as a CSV line, columns in storage order
#[derive(Debug, Serialize)]
pub struct ClaimCsvRow {
    pub claim_type: String,
    pub status: &'static str,
    pub episode_id: i64,
    pub claim: i64,
    pub member_no: i64,
    pub patient: String,
    pub sex: &'static str,
    pub hospital: String,
    pub provider: String,
    pub agreement: String,
    pub service_date: String,
    pub admit_date: String,
    pub disch_date: String,
    pub service: String,
    pub diagnosis: String,
    pub cost: Decimal,
    pub benefit: Decimal,
    pub payee: String,
    pub message_id: String,
    pub severity: String,
    pub full_text: String,
    pub contract_type: String,
}

impl From<ClaimRecord> for ClaimCsvRow {
    fn from(record: ClaimRecord) -> Self {
        let date = |d: chrono::DateTime<chrono::Utc>| d.to_rfc3339();
        Self {
            claim_type: record.claim_type,
            status: record.status.as_str(),
            episode_id: record.episode_id,
            claim: record.claim,
            member_no: record.member_no,
            patient: record.patient,
            sex: record.sex.as_str(),
            hospital: record.hospital,
            provider: record.provider,
            agreement: record.agreement,
            service_date: date(record.service_date),
            admit_date: record.admit_date.map(date).unwrap_or_default(),
            disch_date: record.disch_date.map(date).unwrap_or_default(),
            service: record.service,
            diagnosis: record.diagnosis,
            cost: record.cost,
            benefit: record.benefit,
            payee: record.payee,
            message_id: record.message_id,
            severity: record.severity,
            full_text: record.full_text,
            contract_type: record.contract_type.unwrap_or_default(),
        }
    }
}

/// Renders claims as CSV with a header row, present even with no rows
pub fn render_csv(records: Vec<ClaimRecord>) -> Result<Vec<u8>, ApiError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(ClaimField::ALL.iter().map(|field| field.as_str()))?;
    for record in records {
        writer.serialize(ClaimCsvRow::from(record))?;
    }

    writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("CSV rendering failed: {}", e)))
}
