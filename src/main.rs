use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use api_shared::AuthConfig;
use mch_core::CoreConfig;
use mch_core::config::data_dir_from_env_value;
use mch_predictor::{PredictorClient, PredictorConfig};

/// Main entry point for the MCH service.
///
/// Resolves every setting from the environment once, wires the stores, the token signer and
/// the prediction client into the REST router, and serves it.
///
/// # Environment Variables
/// - `MCH_REST_ADDR`: REST server address (default: "0.0.0.0:3100")
/// - `MCH_DATA_DIR`: root of the JSON store (default: "mch_data")
/// - `JWT_SECRET`: token signing secret (required)
/// - `JWT_TTL_HOURS`: token lifetime in hours (default: 24)
/// - `PREDICT_API_BASE`: base URL of the prediction service (default: "http://localhost:5000")
/// - `PREDICT_API_TIMEOUT_MS`: prediction request timeout (default: 4000)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mch=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("MCH_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3100".into());

    let cfg = CoreConfig::ensure_data_dir(data_dir_from_env_value(
        std::env::var("MCH_DATA_DIR").ok(),
    ))
    .context("failed to prepare data directory")?;

    let auth = AuthConfig::from_env_values(
        std::env::var("JWT_SECRET").ok(),
        std::env::var("JWT_TTL_HOURS").ok(),
    )
    .context("invalid token configuration")?;

    let predictor_cfg = PredictorConfig::from_env_values(
        std::env::var("PREDICT_API_BASE").ok(),
        std::env::var("PREDICT_API_TIMEOUT_MS").ok(),
    )
    .context("invalid prediction service configuration")?;
    let predictor = PredictorClient::new(&predictor_cfg)?;

    tracing::info!("++ Data directory {}", cfg.data_dir().display());
    tracing::info!("++ Prediction service at {}", predictor.predict_url());
    tracing::info!("++ Starting MCH REST on {}", rest_addr);

    let app = api_rest::router(AppState::new(&cfg, auth, Arc::new(predictor)));

    let listener = tokio::net::TcpListener::bind(&rest_addr)
        .await
        .with_context(|| format!("failed to bind {rest_addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
