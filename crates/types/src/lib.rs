//! Small validated value types shared across the MCH crates.
//!
//! Everything in here is pure: no I/O, no configuration. Types guarantee their invariants once
//! constructed, so downstream code can rely on them without re-validating.

mod risk;
mod role;
mod text;

pub use risk::{normalize_risk_label, RiskLabel};
pub use role::Role;
pub use text::{EmailAddress, NationalId, NonEmptyText, TextError};
