use dealership_reviews::{IdAllocation, SeedFiles, StoreConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Document store backend
    #[serde(default)]
    pub store: StoreSettings,

    /// Startup seed datasets
    #[serde(default)]
    pub seed: SeedSettings,

    /// Review id allocation strategy
    #[serde(default)]
    pub id_allocation: IdAllocation,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Memory,
    #[default]
    Mongo,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Connection string, used by the `mongo` backend
    #[serde(default = "default_store_uri")]
    pub uri: String,

    /// Logical database name, used by the `mongo` backend
    #[serde(default = "default_store_database")]
    pub database: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            uri: default_store_uri(),
            database: default_store_database(),
        }
    }
}

impl StoreSettings {
    pub fn store_config(&self) -> StoreConfig {
        match self.backend {
            StoreBackend::Memory => StoreConfig::in_memory(),
            StoreBackend::Mongo => StoreConfig::mongo(&self.uri, &self.database),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedSettings {
    /// Reload both collections before serving
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_reviews_path")]
    pub reviews_path: PathBuf,

    #[serde(default = "default_dealerships_path")]
    pub dealerships_path: PathBuf,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            reviews_path: default_reviews_path(),
            dealerships_path: default_dealerships_path(),
        }
    }
}

impl SeedSettings {
    pub fn files(&self) -> SeedFiles {
        SeedFiles {
            reviews: self.reviews_path.clone(),
            dealerships: self.dealerships_path.clone(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            store: StoreSettings::default(),
            seed: SeedSettings::default(),
            id_allocation: IdAllocation::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, an optional `server.*` config file and
    /// `DEALERSHIP_SERVER__*` environment variables, in increasing precedence.
    pub fn load() -> anyhow::Result<Self> {
        // A missing .env file is the normal case outside development.
        let _ = dotenvy::dotenv();

        let builder = config::Config::builder()
            .add_source(config::File::with_name("server").required(false))
            .add_source(config::Environment::with_prefix("DEALERSHIP_SERVER").separator("__"));

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3030
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_store_uri() -> String {
    "mongodb://mongo_db:27017/".to_string()
}

fn default_store_database() -> String {
    "dealershipsDB".to_string()
}

fn default_reviews_path() -> PathBuf {
    PathBuf::from("data/reviews.json")
}

fn default_dealerships_path() -> PathBuf {
    PathBuf::from("data/dealerships.json")
}
