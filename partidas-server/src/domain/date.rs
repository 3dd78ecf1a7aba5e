//! Calendar date helpers.
//!
//! The remote service and our forms both use ISO `YYYY-MM-DD` dates.

use chrono::NaiveDate;

use super::DomainError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::InvalidDate(s.to_string()))
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        let d = parse_date("2024-03-05").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(format_date(d), "2024-03-05");
    }

    #[test]
    fn parse_trims_whitespace() {
        assert!(parse_date(" 2024-03-05 ").is_ok());
    }

    #[test]
    fn reject_other_formats() {
        assert_eq!(
            parse_date("05/03/2024"),
            Err(DomainError::InvalidDate("05/03/2024".into()))
        );
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("").is_err());
    }
}
