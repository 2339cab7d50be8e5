//! # MCH Core
//!
//! Core business logic for the maternal health records service.
//!
//! This crate contains pure data operations:
//! - Sharded JSON storage for users, mothers, doctors, clinics and medical records
//! - Registration and login (Argon2 password hashing)
//! - The medical-record-and-predict workflow that forwards vitals to the risk predictor
//! - Dashboard aggregation for clinicians
//!
//! **No API concerns**: tokens, HTTP servers, request parsing and response envelopes belong in
//! `api-rest` or `api-shared`.

pub mod bp;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
mod store;

pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};

pub use mch_types::{
    normalize_risk_label, EmailAddress, NationalId, NonEmptyText, RiskLabel, Role, TextError,
};
pub use mch_uuid::{ShardableUuid, UuidError};
