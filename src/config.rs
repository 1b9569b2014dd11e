/// Service configuration from environment variables.
///
/// All settings are optional with production defaults, so the binary runs
/// with no environment at all:
///   - `DATA_API_URL`: base URL of the air-quality upstream
///   - `AI_API_URL`: base URL of the advice upstream
///   - `AIRGUIDE_TIMEOUT_SECS`: per-request HTTP timeout in seconds
///   - `STATION_HINTS_FILE`: TOML file replacing the built-in hint table

use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://epi-log-ai.vercel.app";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_api_url: String,
    pub ai_api_url: String,
    pub request_timeout: Duration,
    pub station_hints_file: Option<String>,
}

impl ServiceConfig {
    pub fn from_env() -> ServiceConfig {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Lookup is injected so tests do not have to mutate process-wide
    // environment state.
    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> ServiceConfig {
        let data_api_url = get("DATA_API_URL")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let ai_api_url = get("AI_API_URL")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let timeout_secs = get("AIRGUIDE_TIMEOUT_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let station_hints_file = get("STATION_HINTS_FILE").filter(|value| !value.is_empty());

        ServiceConfig {
            data_api_url,
            ai_api_url,
            request_timeout: Duration::from_secs(timeout_secs),
            station_hints_file,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
