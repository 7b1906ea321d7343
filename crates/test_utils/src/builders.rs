//! Test Data Builders
//!
//! Provides a builder for claim records with sensible defaults, so tests
//! only spell out the attributes they filter or sort on.

use chrono::{DateTime, Duration, Utc};
use domain_claims::{ClaimRecord, ClaimStatus, Sex};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{DateFixtures, StringFixtures};

/// Builder for constructing test claim records
pub struct ClaimRecordBuilder {
    record: ClaimRecord,
}

impl Default for ClaimRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimRecordBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        let service_date = DateFixtures::service_date();
        Self {
            record: ClaimRecord {
                id: None,
                claim_type: StringFixtures::claim_type().to_string(),
                status: ClaimStatus::Received,
                episode_id: 5001,
                claim: 100_001,
                member_no: 700_001,
                patient: StringFixtures::patient().to_string(),
                sex: Sex::Female,
                hospital: StringFixtures::hospital().to_string(),
                provider: StringFixtures::provider().to_string(),
                agreement: StringFixtures::agreement().to_string(),
                service_date,
                admit_date: Some(service_date),
                disch_date: Some(service_date + Duration::days(2)),
                service: "Consultation".to_string(),
                diagnosis: StringFixtures::diagnosis().to_string(),
                cost: dec!(250.00),
                benefit: dec!(200.00),
                payee: "Provider".to_string(),
                message_id: "MSG-0001".to_string(),
                severity: "Low".to_string(),
                full_text: String::new(),
                contract_type: None,
            },
        }
    }

    /// Sets the claim number, deriving a matching message id
    pub fn with_claim(mut self, claim: i64) -> Self {
        self.record.claim = claim;
        self.record.message_id = format!("MSG-{claim}");
        self
    }

    pub fn with_member_no(mut self, member_no: i64) -> Self {
        self.record.member_no = member_no;
        self
    }

    pub fn with_episode_id(mut self, episode_id: i64) -> Self {
        self.record.episode_id = episode_id;
        self
    }

    pub fn with_status(mut self, status: ClaimStatus) -> Self {
        self.record.status = status;
        self
    }

    pub fn with_claim_type(mut self, claim_type: impl Into<String>) -> Self {
        self.record.claim_type = claim_type.into();
        self
    }

    pub fn with_contract_type(mut self, contract_type: impl Into<String>) -> Self {
        self.record.contract_type = Some(contract_type.into());
        self
    }

    pub fn with_patient(mut self, patient: impl Into<String>) -> Self {
        self.record.patient = patient.into();
        self
    }

    pub fn with_hospital(mut self, hospital: impl Into<String>) -> Self {
        self.record.hospital = hospital.into();
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.record.provider = provider.into();
        self
    }

    pub fn with_agreement(mut self, agreement: impl Into<String>) -> Self {
        self.record.agreement = agreement.into();
        self
    }

    pub fn with_diagnosis(mut self, diagnosis: impl Into<String>) -> Self {
        self.record.diagnosis = diagnosis.into();
        self
    }

    /// Sets the billed cost; the benefit defaults to 80% of it
    pub fn with_cost(mut self, cost: Decimal) -> Self {
        self.record.cost = cost;
        self.record.benefit = (cost * dec!(0.8)).round_dp(2);
        self
    }

    /// Sets the service date, shifting admission and discharge along with it
    pub fn with_service_date(mut self, date: DateTime<Utc>) -> Self {
        self.record.service_date = date;
        self.record.admit_date = Some(date);
        self.record.disch_date = Some(date + Duration::days(2));
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.record.id = Some(id.into());
        self
    }

    /// Builds the claim record
    pub fn build(self) -> ClaimRecord {
        self.record
    }
}
