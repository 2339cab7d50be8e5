use crate::{PredictorError, PredictorResult};
use std::time::Duration;

pub const DEFAULT_PREDICT_API_BASE: &str = "http://localhost:5000";
pub const DEFAULT_PREDICT_TIMEOUT_MS: u64 = 4000;

/// Where the prediction service lives and how long to wait for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredictorConfig {
    base_url: String,
    timeout: Duration,
}

impl PredictorConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> PredictorResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(PredictorError::InvalidConfig(
                "predictor base URL cannot be empty".into(),
            ));
        }
        if timeout.is_zero() {
            return Err(PredictorError::InvalidConfig(
                "predictor timeout must be greater than zero".into(),
            ));
        }
        Ok(Self { base_url, timeout })
    }

    /// Build from raw environment values (`PREDICT_API_BASE`, `PREDICT_API_TIMEOUT_MS`).
    ///
    /// Missing or blank values fall back to the defaults. The caller reads the environment;
    /// this function never does.
    pub fn from_env_values(
        base_url: Option<String>,
        timeout_ms: Option<String>,
    ) -> PredictorResult<Self> {
        let base_url = base_url
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PREDICT_API_BASE.to_string());

        let timeout_ms = match timeout_ms.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                PredictorError::InvalidConfig(format!(
                    "PREDICT_API_TIMEOUT_MS must be a whole number of milliseconds, got '{raw}'"
                ))
            })?,
            None => DEFAULT_PREDICT_TIMEOUT_MS,
        };

        Self::new(base_url, Duration::from_millis(timeout_ms))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url)
    }
}
