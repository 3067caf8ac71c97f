//! Registration and profile field rules.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// local-part@domain, with at least one dot in the domain
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[^@\s]+@[^@\s]+\.[^@\s]+$"
    ).unwrap();

    /// Vietnamese local format: 0 followed by 9 or 10 digits
    static ref PHONE_REGEX: Regex = Regex::new(
        r"^0\d{9,10}$"
    ).unwrap();
}

/// Accepted date-of-birth formats, tried in order
const DOB_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];

/// Storage format of a date of birth
pub const DOB_STORAGE_FORMAT: &str = "%Y-%m-%d";

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// At least 6 characters, one letter and one digit
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 6
        && password.chars().any(char::is_alphabetic)
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Parse a date of birth; the first format that parses wins
pub fn parse_dob(dob: &str) -> Option<NaiveDate> {
    DOB_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(dob, format).ok())
}

/// Parse a date of birth and render it in storage format
pub fn normalize_dob(dob: &str) -> Option<String> {
    parse_dob(dob).map(|date| date.format(DOB_STORAGE_FORMAT).to_string())
}

/// Trimmed value, or None when blank
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("a@test.com"));
        assert!(is_valid_email("first.last+tag@mail.example.vn"));
        assert!(!is_valid_email("a@test"));
        assert!(!is_valid_email("a.test.com"));
        assert!(!is_valid_email("a b@test.com"));
        assert!(!is_valid_email("@test.com"));
    }

    #[test]
    fn test_phone() {
        assert!(is_valid_phone("0912345678"));
        assert!(is_valid_phone("09123456789"));
        assert!(!is_valid_phone("091234567"));
        assert!(!is_valid_phone("091234567890"));
        assert!(!is_valid_phone("+84912345678"));
        assert!(!is_valid_phone("1912345678"));
    }

    #[test]
    fn test_password_strength() {
        assert!(is_strong_password("abc123"));
        assert!(!is_strong_password("ab12"));
        assert!(!is_strong_password("abcdefg"));
        assert!(!is_strong_password("1234567"));
    }

    #[test]
    fn test_dob_formats() {
        assert_eq!(normalize_dob("1990-01-01").as_deref(), Some("1990-01-01"));
        assert_eq!(normalize_dob("15/08/1995").as_deref(), Some("1995-08-15"));
        assert_eq!(normalize_dob("12/31/1999").as_deref(), Some("1999-12-31"));
        // Both day-first and month-first parse: day-first wins
        assert_eq!(normalize_dob("01/02/2000").as_deref(), Some("2000-02-01"));
        assert!(normalize_dob("31/31/1999").is_none());
        assert!(normalize_dob("yesterday").is_none());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  x ")), Some("x"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
