//! US dollar formatting.

use bigdecimal::{BigDecimal, RoundingMode};
use serde::Serializer;

/// Rounds to whole cents, half away from zero.
pub fn round_cents(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfUp)
}

/// Formats an amount as `$1,234.50`: thousands grouping, exactly two
/// decimals, sign ahead of the dollar sign.
pub fn format_usd(amount: &BigDecimal) -> String {
    let (cents, _) = round_cents(amount).as_bigint_and_exponent();
    let digits = cents.to_string();
    let (negative, digits) = match digits.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, digits.as_str()),
    };

    let digits = format!("{digits:0>3}");
    let (whole, fraction) = digits.split_at(digits.len() - 2);

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!(
        "{}${}.{}",
        if negative { "-" } else { "" },
        grouped,
        fraction
    )
}

pub(crate) fn serialize_decimal<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(&dec("1234.5")), "$1,234.50");
        assert_eq!(format_usd(&dec("0")), "$0.00");
        assert_eq!(format_usd(&dec("999.999")), "$1,000.00");
        assert_eq!(format_usd(&dec("1250000")), "$1,250,000.00");
        assert_eq!(format_usd(&dec("12.3")), "$12.30");
        assert_eq!(format_usd(&dec("-45.678")), "-$45.68");
        assert_eq!(format_usd(&dec("0.07")), "$0.07");
    }

    #[test]
    fn test_half_cents_round_up() {
        assert_eq!(format_usd(&dec("1.005")), "$1.01");
        assert_eq!(format_usd(&dec("2.675")), "$2.68");
        assert_eq!(format_usd(&dec("-0.001")), "$0.00");
    }

    #[test]
    fn test_large_amounts_keep_every_digit() {
        assert_eq!(
            format_usd(&dec("100000000000000000000")),
            "$100,000,000,000,000,000,000.00"
        );
    }
}
