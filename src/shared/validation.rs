use chrono::Datelike;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use validator::ValidationError;

use crate::shared::constants::{MIN_YEAR_CREATED, PRICE_INTEGER_DIGITS, PRICE_USD_INTEGER_DIGITS};

lazy_static! {
    /// Loose international phone pattern for WhatsApp numbers
    /// - Valid: "+6281234567890", "081234567890", "+62 812-3456-7890"
    /// - Invalid: "phone", "12", "+62 (812)"
    pub static ref WHATSAPP_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 \-]{6,18}[0-9]$").unwrap();
}

/// Non-negative and within a `NUMERIC(p, 2)` column holding `integer_digits` digits
/// before the decimal point, after rounding to cents the way Postgres does
fn validate_money(value: &Decimal, integer_digits: u32) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("min");
        err.message = Some("Must be at least 0.".into());
        return Err(err);
    }

    let limit = Decimal::from(10_i64.pow(integer_digits));
    let cents = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if cents >= limit {
        let mut err = ValidationError::new("max");
        err.message = Some(format!("May not be greater than {}.", limit - Decimal::new(1, 2)).into());
        return Err(err);
    }
    Ok(())
}

/// Rupiah price, stored as `NUMERIC(15, 2)`
pub fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    validate_money(value, PRICE_INTEGER_DIGITS)
}

/// USD price, stored as `NUMERIC(10, 2)`
pub fn validate_price_usd(value: &Decimal) -> Result<(), ValidationError> {
    validate_money(value, PRICE_USD_INTEGER_DIGITS)
}

/// `year_created` must fall between 1900 and next year
pub fn validate_year_created(year: i32) -> Result<(), ValidationError> {
    let max_year = chrono::Utc::now().year() + 1;
    if year < MIN_YEAR_CREATED || year > max_year {
        let mut err = ValidationError::new("range");
        err.message = Some(
            format!("Year must be between {} and {}.", MIN_YEAR_CREATED, max_year).into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Rejects strings that are empty after trimming
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("This field is required.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;
    use std::str::FromStr;

    #[test]
    fn test_whatsapp_regex_valid() {
        assert!(WHATSAPP_REGEX.is_match("+6281234567890"));
        assert!(WHATSAPP_REGEX.is_match("081234567890"));
        assert!(WHATSAPP_REGEX.is_match("+62 812-3456-7890"));
    }

    #[test]
    fn test_whatsapp_regex_invalid() {
        assert!(!WHATSAPP_REGEX.is_match("phone"));
        assert!(!WHATSAPP_REGEX.is_match("12"));
        assert!(!WHATSAPP_REGEX.is_match("+62 (812)"));
        assert!(!WHATSAPP_REGEX.is_match(""));
    }

    #[test]
    fn test_validate_price_bounds() {
        assert!(validate_price(&Decimal::ZERO).is_ok());
        assert!(validate_price(&Decimal::from(1_000_000)).is_ok());
        assert!(validate_price(&Decimal::from_str("9999999999999.99").unwrap()).is_ok());
        assert!(validate_price(&Decimal::from_f64(-0.01).unwrap()).is_err());

        let err = validate_price(&Decimal::from(100_000_000_000_000_i64)).unwrap_err();
        assert_eq!(err.code, "max");
        assert_eq!(
            err.message.as_deref(),
            Some("May not be greater than 9999999999999.99.")
        );
        // Rounds up to 10^13 in the column
        assert!(validate_price(&Decimal::from_str("9999999999999.995").unwrap()).is_err());
    }

    #[test]
    fn test_validate_price_usd_bounds() {
        assert!(validate_price_usd(&Decimal::from_str("99999999.99").unwrap()).is_ok());
        assert!(validate_price_usd(&Decimal::from(1_000_000_000)).is_err());
        assert!(validate_price_usd(&Decimal::from(100_000_000)).is_err());
        assert!(validate_price_usd(&Decimal::from(-5)).is_err());
    }

    #[test]
    fn test_validate_year_created_bounds() {
        let next_year = chrono::Utc::now().year() + 1;
        assert!(validate_year_created(1900).is_ok());
        assert!(validate_year_created(next_year).is_ok());
        assert!(validate_year_created(1899).is_err());
        assert!(validate_year_created(next_year + 1).is_err());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Oil on canvas").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }
}
