//! Expiry timestamp parsing.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::errors::ValidationError;

/// `datetime-local` layouts accepted in addition to RFC 3339.
const LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parses an authoring-supplied expiry.
///
/// Accepts RFC 3339 (`2026-01-31T12:00:00Z`) or an HTML `datetime-local`
/// value without offset (`2026-01-31T12:00`), which is taken as UTC.
/// An empty string means "no expiry".
///
/// # Errors
///
/// Returns [`ValidationError::MalformedExpiry`] for anything else.
pub fn parse_expiry(input: &str) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| ValidationError::MalformedExpiry(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_expiry("2026-01-31T12:00:00+02:00").unwrap().unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 1, 31, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_datetime_local() {
        let parsed = parse_expiry("2026-01-31T12:30").unwrap().unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 1, 31, 12, 30, 0).unwrap());

        let parsed = parse_expiry("2026-01-31T12:30:15").unwrap().unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 1, 31, 12, 30, 15).unwrap());
    }

    #[test]
    fn test_parse_empty_is_no_expiry() {
        assert_eq!(parse_expiry("").unwrap(), None);
        assert_eq!(parse_expiry("  ").unwrap(), None);
    }

    #[test]
    fn test_parse_malformed() {
        for input in ["tomorrow", "2026-13-01T00:00", "31/01/2026", "1700000000"] {
            assert_eq!(
                parse_expiry(input),
                Err(ValidationError::MalformedExpiry(input.to_string()))
            );
        }
    }
}
