use std::time::Duration;

use crate::errors::CheckError;

/// Environment variable holding the analysis service base address.
pub const BASE_URL_ENV: &str = "TRIO_BASE_URL";
/// Environment variable holding an optional request timeout in seconds.
pub const TIMEOUT_ENV: &str = "TRIO_TIMEOUT_SECS";

const CHECK_ONCE_PATH: &str = "/api/check-once";

/// Settings for the remote analysis service.
///
/// Loaded once at process start. A missing base address is not an error
/// here; the controller reports it when a check is submitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Base address of the service, for example `https://trio.example.com`.
    pub base_url: Option<String>,
    /// Per-request timeout. `None` waits until the service answers or the
    /// request is cancelled.
    pub timeout: Option<Duration>,
}

impl ServiceConfig {
    /// Creates a config pointing at `base_url` with no timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().base_url(base_url)
    }

    /// Reads `TRIO_BASE_URL` and `TRIO_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, CheckError> {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config = config.base_url(base_url);
        }
        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            config.timeout = Some(parse_timeout_secs(&raw)?);
        }
        Ok(config)
    }

    /// Overrides the base address. Blank values leave it unset.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = Some(base_url.trim().to_string()).filter(|s| !s.is_empty());
        self
    }

    /// Sets a per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Full URL of the check-once endpoint, or `None` when unconfigured.
    pub fn check_once_url(&self) -> Option<String> {
        self.base_url
            .as_deref()
            .map(|base| format!("{}{CHECK_ONCE_PATH}", base.trim_end_matches('/')))
    }
}

pub(crate) fn parse_timeout_secs(raw: &str) -> Result<Duration, CheckError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(CheckError::Config(format!(
            "{TIMEOUT_ENV} must be greater than 0"
        ))),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(CheckError::Config(format!(
            "{TIMEOUT_ENV} is not a whole number of seconds: {e}"
        ))),
    }
}
