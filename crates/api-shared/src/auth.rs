//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs signed with `JWT_SECRET`. The secret is resolved once at startup into
//! an [`AuthConfig`]; request handling never reads the environment.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mch_core::models::User;
use mch_core::Role;
use serde::{Deserialize, Serialize};

/// Default token lifetime: one day.
pub const DEFAULT_JWT_TTL_HOURS: i64 = 24;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization token missing or malformed")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Insufficient permissions")]
    Forbidden,
    #[error("invalid auth configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Claims carried by every token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Fails with [`AuthError::Forbidden`] unless the caller holds one of `allowed`.
    pub fn require_role(&self, allowed: &[Role]) -> AuthResult<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl AuthConfig {
    pub fn new(secret: &str, ttl_hours: i64) -> AuthResult<Self> {
        if secret.trim().is_empty() {
            return Err(AuthError::InvalidConfig("JWT_SECRET must not be empty".into()));
        }
        if ttl_hours <= 0 {
            return Err(AuthError::InvalidConfig(format!(
                "JWT_TTL_HOURS must be positive, got {ttl_hours}"
            )));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        })
    }

    /// Build from raw `JWT_SECRET` / `JWT_TTL_HOURS` values. The secret is required.
    pub fn from_env_values(secret: Option<String>, ttl_hours: Option<String>) -> AuthResult<Self> {
        let secret = secret
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AuthError::InvalidConfig("JWT_SECRET is not set".into()))?;
        let ttl_hours = match ttl_hours.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            Some(raw) => raw.parse::<i64>().map_err(|_| {
                AuthError::InvalidConfig(format!("JWT_TTL_HOURS is not a number: {raw}"))
            })?,
            None => DEFAULT_JWT_TTL_HOURS,
        };
        Self::new(&secret, ttl_hours)
    }

    /// Sign a token for `user`.
    pub fn issue(&self, user: &User) -> AuthResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.to_string(),
            role: user.role,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(AuthError::Signing)
    }

    /// Verify signature and expiry.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Verify the value of an `Authorization` header.
    pub fn verify_header(&self, header: Option<&str>) -> AuthResult<Claims> {
        self.verify(bearer_token(header)?)
    }
}

/// Extract the token from `Bearer <token>`.
pub fn bearer_token(header: Option<&str>) -> AuthResult<&str> {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mch_core::{EmailAddress, ShardableUuid};

    fn user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: ShardableUuid::new(),
            email: EmailAddress::parse("doc@example.com").unwrap(),
            first_name: "Kasun".into(),
            last_name: "Silva".into(),
            password_hash: "$argon2id$stub".into(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let cfg = AuthConfig::new("test-secret", 24).unwrap();
        let user = user(Role::Doctor);

        let claims = cfg.verify(&cfg.issue(&user).unwrap()).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, "doc@example.com");
        assert_eq!(claims.role, Role::Doctor);
        assert_eq!(claims.first_name, "Kasun");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn wrong_secret_and_expired_tokens_are_invalid() {
        let cfg = AuthConfig::new("test-secret", 24).unwrap();
        let other = AuthConfig::new("other-secret", 24).unwrap();
        let token = other.issue(&user(Role::Mother)).unwrap();
        assert!(matches!(cfg.verify(&token), Err(AuthError::InvalidToken)));

        let now = Utc::now().timestamp();
        let expired = cfg
            .sign(&Claims {
                sub: "x".into(),
                email: "x@example.com".into(),
                role: Role::Mother,
                first_name: String::new(),
                last_name: String::new(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();
        assert!(matches!(cfg.verify(&expired), Err(AuthError::InvalidToken)));
        assert!(matches!(cfg.verify("not.a.jwt"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc")).unwrap(), "abc");
        for bad in [None, Some(""), Some("Bearer "), Some("Basic abc"), Some("abc")] {
            let err = bearer_token(bad).unwrap_err();
            assert_eq!(err.to_string(), "Authorization token missing or malformed");
        }
    }

    #[test]
    fn role_guard() {
        let cfg = AuthConfig::new("test-secret", 1).unwrap();
        let claims = cfg.verify(&cfg.issue(&user(Role::Mother)).unwrap()).unwrap();
        assert!(claims.require_role(&[Role::Mother]).is_ok());
        let err = claims
            .require_role(&[Role::Doctor, Role::ClinicUser])
            .unwrap_err();
        assert_eq!(err.to_string(), "Insufficient permissions");
    }

    #[test]
    fn config_from_env_values() {
        assert!(matches!(
            AuthConfig::from_env_values(None, None),
            Err(AuthError::InvalidConfig(_))
        ));
        assert!(matches!(
            AuthConfig::from_env_values(Some("  ".into()), None),
            Err(AuthError::InvalidConfig(_))
        ));
        assert!(matches!(
            AuthConfig::from_env_values(Some("s".into()), Some("soon".into())),
            Err(AuthError::InvalidConfig(_))
        ));
        let cfg = AuthConfig::from_env_values(Some("s".into()), None).unwrap();
        assert_eq!(cfg.ttl, Duration::hours(DEFAULT_JWT_TTL_HOURS));
    }
}
