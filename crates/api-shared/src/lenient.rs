//! Field deserialisers for clients that send numbers as strings.
//!
//! Form-driven clients post `"165"` as readily as `165`, and an empty input as `""`. Each
//! helper accepts a JSON number, a numeric string, `""` or `null`; blank values become `None`.
//! Use them with `#[serde(default, deserialize_with = "...")]`.

use chrono::{DateTime, NaiveDate};
use serde::de::{Deserializer, Error};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Number(f64),
    Text(String),
}

fn number<E: Error>(raw: Loose) -> Result<Option<f64>, E> {
    let value = match raw {
        Loose::Number(n) => n,
        Loose::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid number: {s:?}")))?
        }
        Loose::Bool(b) => return Err(E::custom(format!("expected a number, got {b}"))),
    };
    if value.is_finite() {
        Ok(Some(value))
    } else {
        Err(E::custom("number must be finite"))
    }
}

pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => number(raw),
    }
}

/// Whole, non-negative numbers (ages, weeks, mmHg).
pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<Loose>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match number::<D::Error>(raw)? {
        None => Ok(None),
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) => Ok(Some(n as u32)),
        Some(n) => Err(D::Error::custom(format!(
            "expected a whole non-negative number, got {n}"
        ))),
    }
}

/// `true`/`false`, their string forms, or blank.
pub fn opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::Bool(b)) => Ok(Some(b)),
        Some(Loose::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(D::Error::custom(format!("invalid boolean: {s:?}"))),
        },
        Some(Loose::Number(n)) => Err(D::Error::custom(format!("expected a boolean, got {n}"))),
    }
}

/// A calendar date as `YYYY-MM-DD`, or a full RFC 3339 timestamp reduced to its date.
pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.date_naive()))
        .map(Some)
        .map_err(|_| D::Error::custom(format!("invalid date: {raw:?}")))
}
