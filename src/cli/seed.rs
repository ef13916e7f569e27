//! Argument parsing for the seeding commands.

use crate::models::{SortColumn, SortDirection};
use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// Parses an RFC 3339 timestamp into UTC.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the value is not RFC 3339.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::InvalidInput(format!("invalid timestamp '{raw}': {e}")))
}

/// Parses a sort column name.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for unknown columns.
pub fn parse_sort_column(raw: &str) -> Result<SortColumn> {
    SortColumn::parse(raw).ok_or_else(|| {
        Error::InvalidInput(format!(
            "unknown sort column '{raw}', expected id, published_at, created_at or title"
        ))
    })
}

/// Parses a sort direction.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] unless the value is `asc` or `desc`.
pub fn parse_direction(raw: &str) -> Result<SortDirection> {
    SortDirection::parse(raw)
        .ok_or_else(|| Error::InvalidInput(format!("unknown sort direction '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parse_timestamp_normalizes_offset() {
        let ts = parse_timestamp("2024-06-15T14:00:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-06-15T12:00:00+00:00");
    }

    #[test_case("2024-06-15"; "date only")]
    #[test_case("yesterday"; "word")]
    #[test_case(""; "empty")]
    fn test_parse_timestamp_rejects(raw: &str) {
        assert!(matches!(parse_timestamp(raw), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_parse_sort_arguments() {
        assert_eq!(parse_sort_column("title").unwrap(), SortColumn::Title);
        assert!(parse_sort_column("author").is_err());
        assert_eq!(parse_direction("DESC").unwrap(), SortDirection::Desc);
        assert!(parse_direction("sideways").is_err());
    }
}
