//! Mapping of domain errors onto HTTP responses.

use api_shared::{ApiResponse, AuthError};
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mch_core::CoreError;
use serde::de::DeserializeOwned;

/// An error response: the status plus a client-safe message, sent in the standard envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::error(self.status.as_u16(), self.message);
        (self.status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let status = match &err {
            CoreError::InvalidInput(_) | CoreError::Text(_) | CoreError::Uuid(_) => {
                StatusCode::BAD_REQUEST
            }
            CoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            CoreError::SubjectNotFound(_)
            | CoreError::RecordNotFound(_)
            | CoreError::UserNotFound(_) => StatusCode::NOT_FOUND,
            CoreError::EmailInUse | CoreError::NationalIdInUse => StatusCode::CONFLICT,
            CoreError::Predictor(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("request failed: {:?}", err);
        } else {
            tracing::warn!("request rejected: {}", err);
        }

        let message = match &err {
            CoreError::PersistenceFailure { .. } => "Failed to store medical record".to_string(),
            _ if status == StatusCode::INTERNAL_SERVER_ERROR => "Internal error".to_string(),
            _ => err.to_string(),
        };
        Self::new(status, message)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match err {
            AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::InvalidConfig(_) | AuthError::Signing(_) => {
                tracing::error!("auth failure: {:?}", err);
                return Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
            }
        };
        Self::new(status, err.to_string())
    }
}

/// `Json<T>` whose rejection is reported in the standard envelope as a 400.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                rejection.body_text(),
            )),
        }
    }
}

/// Like [`ApiJson`], but an empty body yields `T::default()`.
pub struct JsonOrDefault<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonOrDefault<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }
        match Json::<T>::from_bytes(&bytes) {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                rejection.body_text(),
            )),
        }
    }
}
