//! Input validation for the plain CRUD resources.
//!
//! Account fields are validated by `accounts::validation`; this module
//! covers everything else. Use `ValidationErrorBuilder` from the `error`
//! module to collect several failures into one response.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating HTTP/HTTPS website URLs
    static ref WEBSITE_URL_REGEX: Regex = Regex::new(
        r"^https?://[a-zA-Z0-9][-a-zA-Z0-9]*(\.[a-zA-Z0-9][-a-zA-Z0-9]*)*(:\d+)?(/\S*)?$"
    ).unwrap();
}

/// Validate an optional website URL
pub fn validate_website(website: &Option<String>) -> Result<(), String> {
    if let Some(url) = website {
        if url.is_empty() {
            return Ok(());
        }
        if url.len() > 2048 {
            return Err("Địa chỉ website quá dài (tối đa 2048 ký tự)".to_string());
        }
        if !WEBSITE_URL_REGEX.is_match(url) {
            return Err("Địa chỉ website phải bắt đầu bằng http:// hoặc https://".to_string());
        }
    }
    Ok(())
}

/// Validate a feedback rating (1 to 5)
pub fn validate_rating(rating: Option<i64>) -> Result<(), String> {
    match rating {
        Some(r) if !(1..=5).contains(&r) => Err("Điểm đánh giá phải từ 1 đến 5".to_string()),
        _ => Ok(()),
    }
}

/// Validate a scheduled date: RFC 3339, `yyyy-MM-ddTHH:mm[:ss]` or `yyyy-MM-dd`
pub fn validate_scheduled_date(date: &Option<String>) -> Result<(), String> {
    let Some(date) = date else {
        return Ok(());
    };

    let parses = DateTime::parse_from_rfc3339(date).is_ok()
        || NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok();

    if parses {
        Ok(())
    } else {
        Err("Ngày hẹn không hợp lệ".to_string())
    }
}

/// Validate a non-negative amount of money
pub fn validate_price(price: Option<f64>) -> Result<(), String> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => Err("Giá tiền không được âm".to_string()),
        _ => Ok(()),
    }
}

/// Validate a build item quantity
pub fn validate_quantity(quantity: Option<i64>) -> Result<(), String> {
    match quantity {
        Some(q) if q < 1 => Err("Số lượng phải lớn hơn 0".to_string()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_website() {
        assert!(validate_website(&None).is_ok());
        assert!(validate_website(&Some(String::new())).is_ok());
        assert!(validate_website(&Some("https://phongvu.vn".to_string())).is_ok());
        assert!(validate_website(&Some("http://shop.example.com:8080/pc?id=1".to_string())).is_ok());
        assert!(validate_website(&Some("phongvu.vn".to_string())).is_err());
        assert!(validate_website(&Some("ftp://files.example.com".to_string())).is_err());
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating(None).is_ok());
        assert!(validate_rating(Some(1)).is_ok());
        assert!(validate_rating(Some(5)).is_ok());
        assert!(validate_rating(Some(0)).is_err());
        assert!(validate_rating(Some(6)).is_err());
    }

    #[test]
    fn test_validate_scheduled_date() {
        assert!(validate_scheduled_date(&None).is_ok());
        assert!(validate_scheduled_date(&Some("2025-03-01T09:30:00Z".to_string())).is_ok());
        assert!(validate_scheduled_date(&Some("2025-03-01T09:30:00+07:00".to_string())).is_ok());
        assert!(validate_scheduled_date(&Some("2025-03-01T09:30:00".to_string())).is_ok());
        assert!(validate_scheduled_date(&Some("2025-03-01T09:30".to_string())).is_ok());
        assert!(validate_scheduled_date(&Some("2025-03-01".to_string())).is_ok());
        assert!(validate_scheduled_date(&Some("next monday".to_string())).is_err());
    }

    #[test]
    fn test_validate_price_and_quantity() {
        assert!(validate_price(Some(0.0)).is_ok());
        assert!(validate_price(Some(-1.0)).is_err());
        assert!(validate_price(Some(f64::NAN)).is_err());
        assert!(validate_quantity(None).is_ok());
        assert!(validate_quantity(Some(2)).is_ok());
        assert!(validate_quantity(Some(0)).is_err());
    }
}
