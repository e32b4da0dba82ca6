// ⚙️ Client Configuration
// Read from environment variables, defaults point at the hosted backend

use std::fmt;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://mock-bank-mock-back.yexuz7.easypanel.host";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DB_FILE: &str = "rala.db";
const LOG_FILE: &str = "rala.log";

/// Configuration for the backend client and local storage.
///
/// `Debug` redacts the bearer token.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the banking backend
    pub api_url: Url,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Bearer token of an existing session, if any
    pub token: Option<String>,
    /// Directory holding the flag store and the log file
    pub data_dir: PathBuf,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("data_dir", &self.data_dir)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token: None,
            data_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `RALA_API_URL` (default: the hosted mock backend)
    /// - `RALA_TIMEOUT_SECS` (default: 30)
    /// - `RALA_TOKEN` (optional)
    /// - `RALA_DATA_DIR` (default: current directory)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = std::env::var("RALA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::from_parts(
            &raw_url,
            std::env::var("RALA_TIMEOUT_SECS").ok().as_deref(),
            std::env::var("RALA_TOKEN").ok(),
            std::env::var("RALA_DATA_DIR").ok().map(PathBuf::from),
        )
    }

    fn from_parts(
        raw_url: &str,
        timeout: Option<&str>,
        token: Option<String>,
        data_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(raw_url)?;

        let timeout_secs = match timeout {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.to_string()))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(ClientConfig {
            api_url,
            timeout_secs,
            token: token.filter(|t| !t.is_empty()),
            data_dir: data_dir.unwrap_or_else(|| PathBuf::from(".")),
        })
    }

    /// Point the client at another backend, e.g. a local mock
    pub fn with_api_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_api_url(raw)?;
        Ok(self)
    }

    pub fn flag_store_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidUrl(raw.to_string(), e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl(
            raw.to_string(),
            format!("unsupported scheme {other}"),
        )),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid API URL {0}: {1}")]
    InvalidUrl(String, String),
    #[error("RALA_TIMEOUT_SECS must be a whole number of seconds, got {0:?}")]
    InvalidTimeout(String),
}
