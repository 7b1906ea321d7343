//! Pre-built Test Fixtures
//!
//! Provides ready-to-use claim records and datasets. The datasets are
//! deterministic so tests can assert exact counts and orderings.

use chrono::{DateTime, Duration, TimeZone, Utc};
use domain_claims::{ClaimRecord, ClaimStatus, InMemoryClaimsStore, DEFAULT_COLLECTION};
use fake::faker::name::en::Name;
use fake::Fake;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use crate::builders::ClaimRecordBuilder;

/// Hospitals the standard dataset rotates through
pub const HOSPITALS: [&str; 4] = ["Calvary", "St Vincent", "Royal Hobart", "Launceston General"];

/// Providers the standard dataset rotates through
pub const PROVIDERS: [&str; 3] = ["Dr. Smith", "Dr. Jones", "Dr. Nguyen"];

/// Number of records in [`ClaimFixtures::standard`]
pub const STANDARD_SIZE: usize = 25;

static STANDARD: Lazy<Vec<ClaimRecord>> = Lazy::new(|| {
    (0..STANDARD_SIZE)
        .map(|i| {
            let n = i as i64;
            ClaimRecordBuilder::new()
                .with_id(format!("claim-{i:03}"))
                .with_claim(100_000 + n)
                .with_member_no(700_000 + n % 7)
                .with_episode_id(5_000 + n / 2)
                .with_hospital(HOSPITALS[i % HOSPITALS.len()])
                .with_provider(PROVIDERS[i % PROVIDERS.len()])
                .with_status(ClaimStatus::ALL[i % ClaimStatus::ALL.len()])
                .with_claim_type(if i % 2 == 0 { "Hospital" } else { "Extras" })
                .with_patient(format!("Patient {i:02}"))
                .with_cost(Decimal::new(100 * (n + 1), 0))
                .with_service_date(DateFixtures::service_date() + Duration::days(n))
                .build()
        })
        .collect()
});

/// Fixture for date test data
pub struct DateFixtures;

impl DateFixtures {
    /// First service date of the standard dataset (Jan 1, 2024)
    pub fn service_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    pub fn claim_type() -> &'static str {
        "Hospital"
    }

    pub fn patient() -> &'static str {
        "Jane Citizen"
    }

    pub fn hospital() -> &'static str {
        "Calvary"
    }

    pub fn provider() -> &'static str {
        "Dr. Smith"
    }

    pub fn agreement() -> &'static str {
        "AGR-2024-STD"
    }

    pub fn diagnosis() -> &'static str {
        "Fractured radius"
    }
}

/// Fixture for claim datasets
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// Twenty-five claims over four hospitals, three providers and every
    /// status, one service date per day from Jan 1, 2024
    ///
    /// Record `i` costs `100 * (i + 1)`.
    pub fn standard() -> Vec<ClaimRecord> {
        STANDARD.clone()
    }

    /// Claims whose text attributes contain regex metacharacters
    pub fn with_metacharacters() -> Vec<ClaimRecord> {
        vec![
            ClaimRecordBuilder::new()
                .with_id("meta-1")
                .with_claim(900_001)
                .with_patient("test.search+weird?chars")
                .build(),
            ClaimRecordBuilder::new()
                .with_id("meta-2")
                .with_claim(900_002)
                .with_patient("testXsearchhweird")
                .with_diagnosis("Fracture (left) [minor]")
                .build(),
            ClaimRecordBuilder::new()
                .with_id("meta-3")
                .with_claim(900_003)
                .with_provider("Dr Smith")
                .with_agreement("AGR|2024")
                .build(),
        ]
    }

    /// `count` claims with generated patient names and rotating hospitals
    pub fn random(count: usize) -> Vec<ClaimRecord> {
        (0..count)
            .map(|i| {
                let patient: String = Name().fake();
                let cost: i64 = (50..5_000).fake();
                let days: i64 = (0..365).fake();
                ClaimRecordBuilder::new()
                    .with_claim(200_000 + i as i64)
                    .with_patient(patient)
                    .with_hospital(HOSPITALS[i % HOSPITALS.len()])
                    .with_status(ClaimStatus::ALL[i % ClaimStatus::ALL.len()])
                    .with_cost(Decimal::new(cost, 0))
                    .with_service_date(DateFixtures::service_date() + Duration::days(days))
                    .build()
            })
            .collect()
    }

    /// An in-memory store whose default collection holds `records`
    pub fn store(records: Vec<ClaimRecord>) -> InMemoryClaimsStore {
        InMemoryClaimsStore::new().with_collection(DEFAULT_COLLECTION, records)
    }
}
