//! Environment configuration.

use clinic_core::db::{Database, DbResult};

pub const DEFAULT_DB_PATH: &str = "clinic.db";
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
/// Database path that selects an in-memory database.
pub const IN_MEMORY_DB: &str = ":memory:";
/// Log directives used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "clinic_api=info,clinic_core=info,tower_http=info";

/// Runtime settings for the REST server.
///
/// # Environment Variables
/// - `CLINIC_DB_PATH`: SQLite file (default `clinic.db`, `:memory:` for a throwaway database)
/// - `CLINIC_REST_ADDR`: listen address (default `0.0.0.0:3000`)
/// - `CLINIC_API_KEY`: when set, required in the `x-api-key` header of every `/v1` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub db_path: String,
    pub addr: String,
    pub api_key: Option<String>,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            db_path: read("CLINIC_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into()),
            addr: read("CLINIC_REST_ADDR").unwrap_or_else(|| DEFAULT_ADDR.into()),
            api_key: read("CLINIC_API_KEY"),
        }
    }

    pub fn open_database(&self) -> DbResult<Database> {
        if self.db_path == IN_MEMORY_DB {
            Database::open_in_memory()
        } else {
            Database::open(&self.db_path)
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
