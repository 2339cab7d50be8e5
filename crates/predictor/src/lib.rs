//! # MCH Predictor
//!
//! Client side of the external risk prediction service.
//!
//! The service itself is opaque: it receives a [`FeatureVector`] over HTTP and answers with a
//! label, a probability distribution and some advisory flags. This crate owns:
//! - the wire types ([`FeatureVector`], [`PredictResponse`], [`PredictionData`])
//! - the [`RiskPredictor`] seam used by the core workflow
//! - a reqwest-backed implementation ([`PredictorClient`]) with its configuration
//!
//! Label normalisation is not done here; the raw label is handed back untouched.

mod client;
mod config;
mod types;

pub use client::PredictorClient;
pub use config::{PredictorConfig, DEFAULT_PREDICT_API_BASE, DEFAULT_PREDICT_TIMEOUT_MS};
pub use types::{ComputedFeatures, FeatureVector, PredictResponse, PredictionData};

/// Errors raised while talking to the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictorError {
    /// The request never produced a response (connection refused, DNS, timeout, ...).
    #[error("{0}")]
    Unavailable(String),
    /// A response arrived but it is an error, or it carries no usable prediction.
    #[error("Predict API error: HTTP {status}, code {}", display_code(.code))]
    Rejected { status: u16, code: Option<i64> },
    #[error("invalid predictor configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
}

fn display_code(code: &Option<i64>) -> String {
    code.map_or_else(|| "undefined".to_string(), |c| c.to_string())
}

pub type PredictorResult<T> = std::result::Result<T, PredictorError>;

/// Anything that can turn a feature vector into a prediction.
///
/// A successful call always carries prediction data; an envelope without it is an error.
///
/// Implemented by [`PredictorClient`] for production; tests substitute their own doubles.
#[async_trait::async_trait]
pub trait RiskPredictor: Send + Sync {
    async fn predict(&self, features: &FeatureVector) -> PredictorResult<PredictionData>;
}
