//! Common validation utilities for booking input.

use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Indian mobile numbers: 10 digits, optionally preceded by a country code.
    static ref MOBILE_RE: Regex = Regex::new(r"^(?:\+?91)?[6-9]\d{9}$").unwrap();
    /// Indian postal PIN codes: 6 digits, first digit non-zero.
    static ref PINCODE_RE: Regex = Regex::new(r"^[1-9]\d{5}$").unwrap();
}

/// Strips everything but digits from a phone number, dropping a leading
/// country code so the stored form is always the bare 10-digit number.
pub fn normalize_mobile(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        12 if digits.starts_with("91") => digits[2..].to_string(),
        11 if digits.starts_with('0') => digits[1..].to_string(),
        _ => digits,
    }
}

/// Validates a mobile number after normalization.
pub fn validate_mobile(mobile: &str) -> Result<(), ValidationError> {
    if MOBILE_RE.is_match(&normalize_mobile(mobile)) {
        Ok(())
    } else {
        let mut err = ValidationError::new("mobile_format");
        err.message = Some("Invalid mobile number".into());
        Err(err)
    }
}

/// Validates a 6-digit PIN code.
pub fn validate_pincode(pincode: &str) -> Result<(), ValidationError> {
    if PINCODE_RE.is_match(pincode) {
        Ok(())
    } else {
        let mut err = ValidationError::new("pincode_format");
        err.message = Some("PIN code must be 6 digits".into());
        Err(err)
    }
}

/// Validates that a monetary amount is non-negative.
pub fn validate_price(amount: i64) -> Result<(), ValidationError> {
    if amount >= 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("price_negative");
        err.message = Some("Price must be non-negative".into());
        Err(err)
    }
}

/// Validates that a service date is not in the past (UTC calendar date).
pub fn validate_scheduled_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date >= Utc::now().date_naive() {
        Ok(())
    } else {
        let mut err = ValidationError::new("scheduled_date_past");
        err.message = Some("Scheduled date cannot be in the past".into());
        Err(err)
    }
}

/// Validates the staff headcount requested for a booking.
pub fn validate_staff_count(count: i32) -> Result<(), ValidationError> {
    if (1..=20).contains(&count) {
        Ok(())
    } else {
        let mut err = ValidationError::new("staff_count_range");
        err.message = Some("Required staff count must be between 1 and 20".into());
        Err(err)
    }
}

/// Validates a ward number within a panchayath.
pub fn validate_ward_number(ward: i32) -> Result<(), ValidationError> {
    if ward >= 1 {
        Ok(())
    } else {
        let mut err = ValidationError::new("ward_number_range");
        err.message = Some("Ward number must be positive".into());
        Err(err)
    }
}

/// Validates a star rating.
pub fn validate_rating(rating: i16) -> Result<(), ValidationError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        let mut err = ValidationError::new("rating_range");
        err.message = Some("Rating must be between 1 and 5".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_normalize_mobile_plain() {
        assert_eq!(normalize_mobile("9876543210"), "9876543210");
    }

    #[test]
    fn test_normalize_mobile_formatted() {
        assert_eq!(normalize_mobile("98765-43210"), "9876543210");
        assert_eq!(normalize_mobile("+91 98765 43210"), "9876543210");
        assert_eq!(normalize_mobile("09876543210"), "9876543210");
    }

    #[test]
    fn test_validate_mobile() {
        assert!(validate_mobile("9876543210").is_ok());
        assert!(validate_mobile("+919876543210").is_ok());
        assert!(validate_mobile("12345").is_err());
        assert!(validate_mobile("1234567890").is_err()); // leading 1 not a mobile prefix
        assert!(validate_mobile("").is_err());
    }

    #[test]
    fn test_validate_mobile_error_message() {
        let err = validate_mobile("abc").unwrap_err();
        assert_eq!(err.message.unwrap().to_string(), "Invalid mobile number");
    }

    #[test]
    fn test_validate_pincode() {
        assert!(validate_pincode("682001").is_ok());
        assert!(validate_pincode("110001").is_ok());
        assert!(validate_pincode("012345").is_err()); // leading zero
        assert!(validate_pincode("12345").is_err());
        assert!(validate_pincode("1234567").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(500).is_ok());
        assert!(validate_price(-1).is_err());
    }

    #[test]
    fn test_validate_scheduled_date_today_and_future() {
        let today = Utc::now().date_naive();
        assert!(validate_scheduled_date(&today).is_ok());
        assert!(validate_scheduled_date(&(today + Duration::days(7))).is_ok());
    }

    #[test]
    fn test_validate_scheduled_date_past() {
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        assert!(validate_scheduled_date(&yesterday).is_err());
    }

    #[test]
    fn test_validate_staff_count() {
        assert!(validate_staff_count(1).is_ok());
        assert!(validate_staff_count(2).is_ok());
        assert!(validate_staff_count(20).is_ok());
        assert!(validate_staff_count(0).is_err());
        assert!(validate_staff_count(21).is_err());
        assert!(validate_staff_count(-3).is_err());
    }

    #[test]
    fn test_validate_ward_number() {
        assert!(validate_ward_number(1).is_ok());
        assert!(validate_ward_number(23).is_ok());
        assert!(validate_ward_number(0).is_err());
    }

    #[test]
    fn test_validate_rating() {
        for r in 1..=5 {
            assert!(validate_rating(r).is_ok());
        }
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }
}
