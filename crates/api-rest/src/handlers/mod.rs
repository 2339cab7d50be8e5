pub(crate) mod auth;
pub(crate) mod mothers;
pub(crate) mod records;

use crate::ApiError;
use axum::http::StatusCode;
use mch_core::{CoreError, CoreResult, ShardableUuid};

/// Parse a path identifier, answering 400 when it is not a canonical id.
fn parse_id(raw: &str) -> Result<ShardableUuid, ApiError> {
    ShardableUuid::parse(raw.trim()).map_err(|e| ApiError::from(CoreError::from(e)))
}

/// Run CPU-heavy core work (password hashing) on the blocking pool.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> CoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => Ok(result?),
        Err(e) => {
            tracing::error!("blocking task failed: {}", e);
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error",
            ))
        }
    }
}
