use rust_decimal::{Decimal, RoundingStrategy};

/// Rupiah display string: `Rp 1.500.000` (no decimals, `.` thousands separator)
pub fn format_idr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("Rp -{}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

/// `60 x 80 cm`
pub fn format_dimensions(width: i32, height: i32) -> String {
    format!("{} x {} cm", width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_idr_groups_thousands() {
        assert_eq!(format_idr(Decimal::from(1_000_000)), "Rp 1.000.000");
        assert_eq!(format_idr(Decimal::from(500)), "Rp 500");
        assert_eq!(format_idr(Decimal::from(12_500)), "Rp 12.500");
        assert_eq!(format_idr(Decimal::ZERO), "Rp 0");
    }

    #[test]
    fn test_format_idr_rounds_half_away_from_zero() {
        assert_eq!(format_idr(Decimal::from_str("1999.50").unwrap()), "Rp 2.000");
        assert_eq!(format_idr(Decimal::from_str("1999.49").unwrap()), "Rp 1.999");
    }

    #[test]
    fn test_format_dimensions() {
        assert_eq!(format_dimensions(60, 80), "60 x 80 cm");
    }
}
