//! Medical claim record

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ClaimError;
use crate::query::Value;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    Assessed,
    Paid,
    Verified,
    Received,
    Cancelled,
}

impl ClaimStatus {
    /// Every status, in display order
    pub const ALL: [ClaimStatus; 5] = [
        ClaimStatus::Assessed,
        ClaimStatus::Paid,
        ClaimStatus::Verified,
        ClaimStatus::Received,
        ClaimStatus::Cancelled,
    ];

    /// The stored representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Assessed => "Assessed",
            ClaimStatus::Paid => "Paid",
            ClaimStatus::Verified => "Verified",
            ClaimStatus::Received => "Received",
            ClaimStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClaimStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ClaimError::UnknownStatus(s.to_string()))
    }
}

/// Patient sex as recorded on the claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Other => "O",
        }
    }
}

/// A filterable or sortable attribute of a claim, named as it is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimField {
    ClaimType,
    Status,
    EpisodeId,
    Claim,
    MemberNo,
    Patient,
    Sex,
    Hospital,
    Provider,
    Agreement,
    ServiceDate,
    AdmitDate,
    DischDate,
    Service,
    Diagnosis,
    Cost,
    Benefit,
    Payee,
    MessageId,
    Severity,
    FullText,
    ContractType,
}

impl ClaimField {
    pub const ALL: [ClaimField; 22] = [
        ClaimField::ClaimType,
        ClaimField::Status,
        ClaimField::EpisodeId,
        ClaimField::Claim,
        ClaimField::MemberNo,
        ClaimField::Patient,
        ClaimField::Sex,
        ClaimField::Hospital,
        ClaimField::Provider,
        ClaimField::Agreement,
        ClaimField::ServiceDate,
        ClaimField::AdmitDate,
        ClaimField::DischDate,
        ClaimField::Service,
        ClaimField::Diagnosis,
        ClaimField::Cost,
        ClaimField::Benefit,
        ClaimField::Payee,
        ClaimField::MessageId,
        ClaimField::Severity,
        ClaimField::FullText,
        ClaimField::ContractType,
    ];

    /// The document key this field is stored under
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimField::ClaimType => "claim_type",
            ClaimField::Status => "status",
            ClaimField::EpisodeId => "episode_id",
            ClaimField::Claim => "claim",
            ClaimField::MemberNo => "member_no",
            ClaimField::Patient => "patient",
            ClaimField::Sex => "sex",
            ClaimField::Hospital => "hospital",
            ClaimField::Provider => "provider",
            ClaimField::Agreement => "agreement",
            ClaimField::ServiceDate => "service_date",
            ClaimField::AdmitDate => "admit_date",
            ClaimField::DischDate => "disch_date",
            ClaimField::Service => "service",
            ClaimField::Diagnosis => "diagnosis",
            ClaimField::Cost => "cost",
            ClaimField::Benefit => "benefit",
            ClaimField::Payee => "payee",
            ClaimField::MessageId => "message_id",
            ClaimField::Severity => "severity",
            ClaimField::FullText => "full_text",
            ClaimField::ContractType => "contract_type",
        }
    }
}

impl fmt::Display for ClaimField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimField {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClaimField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ClaimError::UnknownField(s.to_string()))
    }
}

/// One insurance claim line
///
/// Records are read-only as far as this crate is concerned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Storage identifier, when the backing store assigns one
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub claim_type: String,
    pub status: ClaimStatus,
    pub episode_id: i64,
    /// Claim number
    pub claim: i64,
    /// Member number
    pub member_no: i64,
    /// Patient name
    pub patient: String,
    pub sex: Sex,
    pub hospital: String,
    pub provider: String,
    pub agreement: String,
    pub service_date: DateTime<Utc>,
    /// Admission date
    pub admit_date: Option<DateTime<Utc>>,
    /// Discharge date
    pub disch_date: Option<DateTime<Utc>>,
    /// Service description
    pub service: String,
    pub diagnosis: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub benefit: Decimal,
    pub payee: String,
    pub message_id: String,
    pub severity: String,
    /// Free text
    pub full_text: String,
    pub contract_type: Option<String>,
}

impl ClaimRecord {
    /// Returns the value of `field` on this record, or `None` when the
    /// optional attribute is unset
    pub fn value_of(&self, field: ClaimField) -> Option<Value> {
        let text = |s: &str| Some(Value::Text(s.to_string()));
        match field {
            ClaimField::ClaimType => text(&self.claim_type),
            ClaimField::Status => text(self.status.as_str()),
            ClaimField::EpisodeId => Some(Value::Int(self.episode_id)),
            ClaimField::Claim => Some(Value::Int(self.claim)),
            ClaimField::MemberNo => Some(Value::Int(self.member_no)),
            ClaimField::Patient => text(&self.patient),
            ClaimField::Sex => text(self.sex.as_str()),
            ClaimField::Hospital => text(&self.hospital),
            ClaimField::Provider => text(&self.provider),
            ClaimField::Agreement => text(&self.agreement),
            ClaimField::ServiceDate => Some(Value::Date(self.service_date)),
            ClaimField::AdmitDate => self.admit_date.map(Value::Date),
            ClaimField::DischDate => self.disch_date.map(Value::Date),
            ClaimField::Service => text(&self.service),
            ClaimField::Diagnosis => text(&self.diagnosis),
            ClaimField::Cost => Some(Value::Decimal(self.cost)),
            ClaimField::Benefit => Some(Value::Decimal(self.benefit)),
            ClaimField::Payee => text(&self.payee),
            ClaimField::MessageId => text(&self.message_id),
            ClaimField::Severity => text(&self.severity),
            ClaimField::FullText => text(&self.full_text),
            ClaimField::ContractType => self.contract_type.as_deref().and_then(text),
        }
    }
}
