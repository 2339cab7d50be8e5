use crate::error::ApiError;
use crate::AppState;
use api_shared::Claims;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use mch_core::{Role, ShardableUuid};

/// The caller, authenticated from an `Authorization: Bearer <token>` header.
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), ApiError> {
        Ok(self.0.require_role(allowed)?)
    }

    pub fn user_id(&self) -> Result<ShardableUuid, ApiError> {
        ShardableUuid::parse(&self.0.sub)
            .map_err(|_| ApiError::new(StatusCode::UNAUTHORIZED, "Invalid or expired token"))
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let claims = state.auth.verify_header(header)?;
        Ok(Self(claims))
    }
}
