//! API configuration

use serde::Deserialize;

use domain_claims::{ClaimsServiceConfig, DEFAULT_COLLECTION};
use infra_db::{DatabaseConfig, DEFAULT_DATABASE, DEFAULT_MAX_POOL_SIZE};

/// Application name reported to the database
pub const APP_NAME: &str = "claims-api";

/// Unprefixed variables honoured when the `API_` form is unset
const FALLBACK_VARS: [(&str, &str); 3] = [
    ("mongodb_uri", "MONGODB_URI"),
    ("database", "MONGODB_DATABASE"),
    ("collection", "MEDICAL_CLAIMS_COLLECTION"),
];

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// MongoDB connection string
    pub mongodb_uri: String,
    /// Database holding the claims collection
    pub database: String,
    /// Claims collection name
    pub collection: String,
    /// Maximum pooled connections per server
    pub max_pool_size: u32,
    /// Bind page rows and counts to one snapshot (replica sets only)
    pub snapshot_reads: bool,
    /// Log level
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            mongodb_uri: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
            snapshot_reads: false,
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    ///
    /// `API_`-prefixed variables win; `MONGODB_URI`, `MONGODB_DATABASE` and
    /// `MEDICAL_CLAIMS_COLLECTION` are read when their prefixed form is unset.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        for (key, var) in FALLBACK_VARS {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_default(key, value)?;
            }
        }
        builder
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings for the MongoDB client
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.mongodb_uri)
            .database(&self.database)
            .max_pool_size(self.max_pool_size)
            .snapshot_reads(self.snapshot_reads)
            .app_name(APP_NAME)
    }

    /// Settings for the claims services
    pub fn service_config(&self) -> ClaimsServiceConfig {
        ClaimsServiceConfig::new(&self.collection)
    }
}
