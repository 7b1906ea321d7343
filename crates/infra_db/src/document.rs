//! Stored claim documents
//!
//! [`ClaimDocument`] mirrors the document layout in the claims collection:
//! BSON datetimes, numeric costs of any width, and an `_id` that may be an
//! ObjectId or a string. Claim, member and episode numbers may be stored as
//! 32/64-bit integers or as whole doubles (as left behind by JSON and CSV
//! imports). It converts into the domain [`ClaimRecord`].

use bson::{Bson, Document};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer};

use domain_claims::{ClaimRecord, ClaimStatus, Sex};

use crate::error::DatabaseError;

/// Claim document as stored in MongoDB
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimDocument {
    #[serde(rename = "_id", default)]
    pub id: Option<Bson>,
    pub claim_type: String,
    pub status: ClaimStatus,
    #[serde(deserialize_with = "stored_integer")]
    pub episode_id: i64,
    #[serde(deserialize_with = "stored_integer")]
    pub claim: i64,
    #[serde(deserialize_with = "stored_integer")]
    pub member_no: i64,
    pub patient: String,
    pub sex: Sex,
    pub hospital: String,
    pub provider: String,
    pub agreement: String,
    pub service_date: bson::DateTime,
    #[serde(default)]
    pub admit_date: Option<bson::DateTime>,
    #[serde(default)]
    pub disch_date: Option<bson::DateTime>,
    pub service: String,
    pub diagnosis: String,
    pub cost: f64,
    pub benefit: f64,
    pub payee: String,
    pub message_id: String,
    pub severity: String,
    #[serde(default)]
    pub full_text: String,
    #[serde(default)]
    pub contract_type: Option<String>,
}

impl ClaimDocument {
    /// Decodes a raw document returned by the driver
    pub fn from_document(document: Document) -> Result<Self, DatabaseError> {
        let id = document
            .get("_id")
            .map(id_string)
            .unwrap_or_else(|| "<no _id>".to_string());
        bson::from_document(document).map_err(|e| DatabaseError::decode(id, e))
    }

    /// Converts the stored document into the domain record
    pub fn into_record(self) -> Result<ClaimRecord, DatabaseError> {
        let id = self.id.as_ref().map(id_string);
        let label = id.clone().unwrap_or_else(|| self.claim.to_string());

        Ok(ClaimRecord {
            cost: money(self.cost, "cost", &label)?,
            benefit: money(self.benefit, "benefit", &label)?,
            id,
            claim_type: self.claim_type,
            status: self.status,
            episode_id: self.episode_id,
            claim: self.claim,
            member_no: self.member_no,
            patient: self.patient,
            sex: self.sex,
            hospital: self.hospital,
            provider: self.provider,
            agreement: self.agreement,
            service_date: self.service_date.to_chrono(),
            admit_date: self.admit_date.map(|d| d.to_chrono()),
            disch_date: self.disch_date.map(|d| d.to_chrono()),
            service: self.service,
            diagnosis: self.diagnosis,
            payee: self.payee,
            message_id: self.message_id,
            severity: self.severity,
            full_text: self.full_text,
            contract_type: self.contract_type,
        })
    }
}

/// Decodes a driver document straight into the domain record
pub fn decode_claim(document: Document) -> Result<ClaimRecord, DatabaseError> {
    ClaimDocument::from_document(document)?.into_record()
}

fn id_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Accepts any BSON integer, or a double with no fractional part
fn stored_integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::Int32(n) => Ok(i64::from(n)),
        Bson::Int64(n) => Ok(n),
        Bson::Double(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(f as i64),
        other => Err(de::Error::custom(format!("expected a whole number, found {other}"))),
    }
}

fn money(value: f64, field: &str, label: &str) -> Result<Decimal, DatabaseError> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2))
        .ok_or_else(|| DatabaseError::decode(label, format!("{field} is not a finite amount")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use bson::oid::ObjectId;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn stored() -> Document {
        doc! {
            "_id": ObjectId::parse_str("65a1b2c3d4e5f60718293a4b").unwrap(),
            "claim_type": "Hospital",
            "status": "Paid",
            "episode_id": 5001_i32,
            "claim": 100_001_i64,
            "member_no": 700_001_i32,
            "patient": "Jane Citizen",
            "sex": "F",
            "hospital": "Calvary",
            "provider": "Dr. Smith",
            "agreement": "AGR-2024-STD",
            "service_date": bson::DateTime::from_chrono(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            "service": "Consultation",
            "diagnosis": "Fractured radius",
            "cost": 250.5,
            "benefit": 200_i32,
            "payee": "Provider",
            "message_id": "MSG-1",
            "severity": "Low",
        }
    }

    #[test]
    fn test_decode_stored_document() {
        let record = decode_claim(stored()).unwrap();

        assert_eq!(record.id.as_deref(), Some("65a1b2c3d4e5f60718293a4b"));
        assert_eq!(record.status, ClaimStatus::Paid);
        assert_eq!(record.episode_id, 5001);
        assert_eq!(record.cost, dec!(250.5));
        assert_eq!(record.benefit, dec!(200));
        assert_eq!(record.service_date, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert!(record.admit_date.is_none());
        assert!(record.contract_type.is_none());
        assert_eq!(record.full_text, "");
    }

    #[test]
    fn test_string_id_is_kept() {
        let mut document = stored();
        document.insert("_id", "claim-42");

        let record = decode_claim(document).unwrap();
        assert_eq!(record.id.as_deref(), Some("claim-42"));
    }

    #[test]
    fn test_missing_field_is_decode_error() {
        let mut document = stored();
        document.remove("cost");

        let err = decode_claim(document).unwrap_err();
        assert!(matches!(err, DatabaseError::Decode(_)));
        assert!(err.to_string().contains("65a1b2c3d4e5f60718293a4b"));
    }

    #[test]
    fn test_unknown_status_is_decode_error() {
        let mut document = stored();
        document.insert("status", "Lost");

        assert!(decode_claim(document).is_err());
    }

    #[test]
    fn test_whole_doubles_decode_as_integers() {
        let mut document = stored();
        document.insert("claim", 100_001.0_f64);
        document.insert("member_no", 700_001.0_f64);
        document.insert("episode_id", 5001_i64);

        let record = decode_claim(document).unwrap();
        assert_eq!(record.claim, 100_001);
        assert_eq!(record.member_no, 700_001);
        assert_eq!(record.episode_id, 5001);
    }

    #[test]
    fn test_fractional_claim_number_is_decode_error() {
        let mut document = stored();
        document.insert("claim", 100_001.5_f64);

        assert!(matches!(decode_claim(document), Err(DatabaseError::Decode(_))));
    }
}
