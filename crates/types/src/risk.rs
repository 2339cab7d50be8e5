use serde::Serialize;

/// Normalised outcome of a risk prediction.
///
/// This is the only form in which a risk label is ever stored. Deserialisation goes through
/// [`normalize_risk_label`], so an arbitrary string can never sneak into a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLabel {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLabel {
    pub const fn as_str(self) -> &'static str {
        match self {
            RiskLabel::Low => "LOW",
            RiskLabel::Medium => "MEDIUM",
            RiskLabel::High => "HIGH",
            RiskLabel::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for RiskLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(normalize_risk_label(Some(&raw)))
    }
}

/// Maps a raw predictor label onto the closed [`RiskLabel`] set.
///
/// The input is uppercased and must then match `LOW`, `MEDIUM` or `HIGH` exactly; anything
/// else, including absent or empty input, is `UNKNOWN`. Never fails.
pub fn normalize_risk_label(raw: Option<&str>) -> RiskLabel {
    match raw.map(str::to_uppercase).as_deref() {
        Some("LOW") => RiskLabel::Low,
        Some("MEDIUM") => RiskLabel::Medium,
        Some("HIGH") => RiskLabel::High,
        _ => RiskLabel::Unknown,
    }
}
