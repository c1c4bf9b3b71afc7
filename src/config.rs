use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_STATIC_SNAPSHOT: &str = "public/analytics-db.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Source locations, loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub static_snapshot: PathBuf,
    pub timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            static_snapshot: PathBuf::from(DEFAULT_STATIC_SNAPSHOT),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_base_url: lookup("DASHBOARD_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            static_snapshot: lookup("DASHBOARD_STATIC_SNAPSHOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_SNAPSHOT)),
            timeout: Duration::from_secs(
                lookup("DASHBOARD_TIMEOUT_SECS")
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }

    /// Endpoint serving both the aggregate report and the raw rows.
    pub fn reports_url(&self) -> String {
        format!("{}/all-rapports", self.api_base_url.trim_end_matches('/'))
    }
}
