use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request body for `POST {base}/predict`.
///
/// Every field is mandatory on the wire; callers substitute defaults before building one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FeatureVector {
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bp_str: String,
    #[serde(rename = "sugar_mg_dL")]
    pub sugar_mg_dl: f64,
}

/// Envelope returned by the prediction service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<PredictionData>,
}

/// Absent and `null` fields both decode to their default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PredictionData {
    /// Raw label, typically `Low`, `Medium` or `High` but not guaranteed.
    #[serde(default)]
    pub predicted_label: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub predicted_proba: BTreeMap<String, f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feature_vector: ComputedFeatures,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub override_applied: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The features as the service computed them (derived values such as BMI included).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ComputedFeatures {
    #[serde(rename = "Age", default)]
    pub age: Option<f64>,
    #[serde(rename = "BMI", default)]
    pub bmi: Option<f64>,
    #[serde(rename = "Diastolic", default)]
    pub diastolic: Option<f64>,
    #[serde(rename = "Height_cm", default)]
    pub height_cm: Option<f64>,
    #[serde(rename = "RuleRiskScore", default)]
    pub rule_risk_score: Option<f64>,
    #[serde(rename = "Sugar_mg_dL", default)]
    pub sugar_mg_dl: Option<f64>,
    #[serde(rename = "Systolic", default)]
    pub systolic: Option<f64>,
    #[serde(rename = "Weight_kg", default)]
    pub weight_kg: Option<f64>,
}
