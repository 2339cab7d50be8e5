use crate::{
    FeatureVector, PredictResponse, PredictionData, PredictorConfig, PredictorError,
    PredictorResult, RiskPredictor,
};

/// reqwest-backed [`RiskPredictor`].
///
/// Built once at startup and shared; `reqwest::Client` pools connections internally.
/// Every HTTP status is read and judged here rather than by the transport, so transport
/// failures and application-level rejections produce distinguishable errors.
#[derive(Clone, Debug)]
pub struct PredictorClient {
    http: reqwest::Client,
    predict_url: String,
}

impl PredictorClient {
    pub fn new(config: &PredictorConfig) -> PredictorResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(PredictorError::ClientBuild)?;

        Ok(Self {
            http,
            predict_url: config.predict_url(),
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }
}

#[async_trait::async_trait]
impl RiskPredictor for PredictorClient {
    async fn predict(&self, features: &FeatureVector) -> PredictorResult<PredictionData> {
        tracing::info!(url = %self.predict_url, "requesting risk prediction");

        let response = self
            .http
            .post(&self.predict_url)
            .json(features)
            .send()
            .await
            .map_err(|e| PredictorError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PredictorError::Unavailable(e.to_string()))?;

        // The envelope is read loosely first so `code` survives a malformed `data`.
        let envelope: Option<serde_json::Value> = if bytes.is_empty() {
            None
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(status, "undecodable predictor response: {}", e);
                    None
                }
            }
        };

        let code = envelope
            .as_ref()
            .and_then(|v| v.get("code"))
            .and_then(serde_json::Value::as_i64);
        let body = envelope.and_then(|v| match serde_json::from_value::<PredictResponse>(v) {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(status, "malformed predictor payload: {}", e);
                None
            }
        });

        match body.and_then(|b| b.data) {
            Some(data) if status < 400 && code.map_or(true, |c| c < 400) => Ok(data),
            _ => {
                let err = PredictorError::Rejected { status, code };
                tracing::error!("{}", err);
                Err(err)
            }
        }
    }
}
