//! Database Test Utilities
//!
//! Provides a MongoDB test container and helpers for seeding claim
//! documents in adapter integration tests. Tests using it need Docker.

use std::sync::Arc;

use bson::{doc, Bson, Document};
use domain_claims::ClaimRecord;
use infra_db::{create_client, DatabaseConfig, DatabaseError, MongoClaimsStore};
use mongodb::Client;
use rust_decimal::prelude::ToPrimitive;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage,
};
use tokio::sync::OnceCell;

/// Default MongoDB image for testing
const MONGO_IMAGE: &str = "mongo";
const MONGO_TAG: &str = "7";

/// Database the test store is pointed at
pub const TEST_DATABASE: &str = "medi_claims_test";

/// A wrapper around a MongoDB test container
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    pub uri: String,
    client: Client,
}

impl TestDatabase {
    /// Starts a new MongoDB container for testing
    ///
    /// # Errors
    ///
    /// Returns an error if the container fails to start or the client
    /// cannot be created
    pub async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let container = GenericImage::new(MONGO_IMAGE, MONGO_TAG)
            .with_exposed_port(27017.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Waiting for connections"))
            .start()
            .await?;

        let port = container.get_host_port_ipv4(27017).await?;
        let host = container.get_host().await?.to_string();
        let uri = format!("mongodb://{}:{}", host, port);

        let client = create_client(&Self::config_for(&uri)).await?;

        Ok(Self {
            _container: container,
            uri,
            client,
        })
    }

    fn config_for(uri: &str) -> DatabaseConfig {
        DatabaseConfig::new(uri)
            .database(TEST_DATABASE)
            .app_name("claims-tests")
    }

    /// Client configuration pointing at the container
    pub fn config(&self) -> DatabaseConfig {
        Self::config_for(&self.uri)
    }

    /// A claims store over the test database
    pub async fn store(&self) -> Result<MongoClaimsStore, DatabaseError> {
        MongoClaimsStore::connect(self.config()).await
    }

    /// Replaces the contents of `collection` with `records`
    pub async fn seed(
        &self,
        collection: &str,
        records: &[ClaimRecord],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let collection = self
            .client
            .database(TEST_DATABASE)
            .collection::<Document>(collection);
        collection.drop().await?;
        if !records.is_empty() {
            collection
                .insert_many(records.iter().map(claim_document))
                .await?;
        }
        Ok(())
    }
}

/// Renders a claim record in the stored document layout
pub fn claim_document(record: &ClaimRecord) -> Document {
    let date = |d: chrono::DateTime<chrono::Utc>| Bson::DateTime(bson::DateTime::from_chrono(d));
    let mut document = doc! {
        "claim_type": record.claim_type.as_str(),
        "status": record.status.as_str(),
        "episode_id": record.episode_id,
        "claim": record.claim,
        "member_no": record.member_no,
        "patient": record.patient.as_str(),
        "sex": record.sex.as_str(),
        "hospital": record.hospital.as_str(),
        "provider": record.provider.as_str(),
        "agreement": record.agreement.as_str(),
        "service_date": date(record.service_date),
        "service": record.service.as_str(),
        "diagnosis": record.diagnosis.as_str(),
        "cost": record.cost.to_f64().unwrap_or_default(),
        "benefit": record.benefit.to_f64().unwrap_or_default(),
        "payee": record.payee.as_str(),
        "message_id": record.message_id.as_str(),
        "severity": record.severity.as_str(),
        "full_text": record.full_text.as_str(),
    };
    if let Some(id) = &record.id {
        document.insert("_id", id.as_str());
    }
    if let Some(admit) = record.admit_date {
        document.insert("admit_date", date(admit));
    }
    if let Some(disch) = record.disch_date {
        document.insert("disch_date", date(disch));
    }
    if let Some(contract_type) = &record.contract_type {
        document.insert("contract_type", contract_type.as_str());
    }
    document
}

/// Global test database for shared integration tests
static SHARED_TEST_DB: OnceCell<Arc<TestDatabase>> = OnceCell::const_new();

/// Gets or creates a shared test database instance
///
/// # Panics
///
/// Panics if the container fails to start
pub async fn get_shared_test_database() -> Arc<TestDatabase> {
    SHARED_TEST_DB
        .get_or_init(|| async {
            Arc::new(
                TestDatabase::new()
                    .await
                    .expect("Failed to start MongoDB test container"),
            )
        })
        .await
        .clone()
}

/// Declares a MongoDB integration test
///
/// The test is ignored by default; run it with `--ignored` where Docker is
/// available. The body sees the shared database as `db`.
#[macro_export]
macro_rules! mongo_test {
    ($name:ident, |$db:ident| $body:block) => {
        #[tokio::test]
        #[ignore = "requires Docker"]
        async fn $name() {
            let $db = $crate::database::get_shared_test_database().await;
            $body
        }
    };
}
