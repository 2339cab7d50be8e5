//! # API Shared
//!
//! Shared utilities and definitions for the MCH REST API and CLI.
//!
//! Contains:
//! - Request/response DTOs and their conversion into core inputs (`dto`)
//! - The `{code, message, data}` response envelope (`envelope`)
//! - Lenient field parsers for loosely typed clients (`lenient`)
//! - JWT issuing and verification (`auth`)
//! - Shared services like `HealthService`

pub mod auth;
pub mod dto;
pub mod envelope;
pub mod health;
pub mod lenient;

pub use auth::{AuthConfig, AuthError, AuthResult, Claims};
pub use envelope::ApiResponse;
pub use health::{HealthRes, HealthService};
