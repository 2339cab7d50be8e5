//! Blood-pressure reading helpers.
//!
//! Readings travel as `"SYS/DIA"` strings. Each component is two or three digits; whitespace
//! around the slash is tolerated.

/// Compose a reading string from its parts, e.g. `format_bp(120, 80) == "120/80"`.
pub fn format_bp(systolic: u32, diastolic: u32) -> String {
    format!("{systolic}/{diastolic}")
}

/// Split a reading string into `(systolic, diastolic)`.
///
/// Returns `None` for anything that is not two 2–3 digit numbers separated by `/`.
pub fn parse_bp(input: &str) -> Option<(u32, u32)> {
    let (systolic, diastolic) = input.trim().split_once('/')?;
    Some((component(systolic.trim())?, component(diastolic.trim())?))
}

/// The reading a caller actually supplied.
///
/// A non-blank string wins and is passed on exactly as given, unvalidated; otherwise a
/// complete systolic/diastolic pair is composed into `"S/D"`. A lone systolic or diastolic
/// value is not a reading.
pub fn compose_bp(
    reading: Option<&str>,
    systolic: Option<u32>,
    diastolic: Option<u32>,
) -> Option<String> {
    match reading.filter(|r| !r.trim().is_empty()) {
        Some(reading) => Some(reading.to_string()),
        None => match (systolic, diastolic) {
            (Some(s), Some(d)) => Some(format_bp(s, d)),
            _ => None,
        },
    }
}

fn component(part: &str) -> Option<u32> {
    if !(2..=3).contains(&part.len()) || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_systolic_over_diastolic() {
        assert_eq!(format_bp(120, 80), "120/80");
        assert_eq!(format_bp(95, 60), "95/60");
    }

    #[test]
    fn parses_with_and_without_spaces() {
        assert_eq!(parse_bp("120/80"), Some((120, 80)));
        assert_eq!(parse_bp("120 / 80"), Some((120, 80)));
        assert_eq!(parse_bp(" 90/60 "), Some((90, 60)));
    }

    #[test]
    fn compose_prefers_string_then_pair() {
        assert_eq!(compose_bp(Some("118/76"), Some(140), Some(90)).as_deref(), Some("118/76"));
        assert_eq!(compose_bp(Some(" 118 / 76 "), None, None).as_deref(), Some(" 118 / 76 "));
        assert_eq!(compose_bp(Some("high"), None, None).as_deref(), Some("high"));
        assert_eq!(compose_bp(Some("  "), Some(140), Some(90)).as_deref(), Some("140/90"));
        assert_eq!(compose_bp(None, Some(140), Some(90)).as_deref(), Some("140/90"));
        assert_eq!(compose_bp(None, Some(140), None), None);
        assert_eq!(compose_bp(None, None, None), None);
    }

    #[test]
    fn rejects_malformed_readings() {
        for bad in ["", "120", "120/", "/80", "1200/80", "9/60", "12a/80", "120-80", "120/80/60"] {
            assert_eq!(parse_bp(bad), None, "{bad:?} should not parse");
        }
    }
}
