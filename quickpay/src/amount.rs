//! Human-readable token amounts.
//!
//! Sellers type amounts the way people read them (`"1.50"`), while token
//! contracts count in base units (`1500000` for a 6-decimals token). This
//! module converts between the two without going through floating point.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;

/// Errors produced while parsing a human-readable amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// The amount is empty.
    #[error("amount is empty")]
    Empty,
    /// The amount contains something other than digits and one decimal point.
    #[error("`{0}` is not a valid amount")]
    Invalid(String),
    /// The amount has more fractional digits than the token supports.
    #[error("`{amount}` has more than {decimals} decimal places")]
    TooPrecise {
        /// The rejected amount.
        amount: String,
        /// The token's decimal precision.
        decimals: u8,
    },
    /// The amount does not fit in the token's base-unit range.
    #[error("`{0}` is out of range")]
    OutOfRange(String),
    /// The amount is zero.
    #[error("amount must be greater than zero")]
    Zero,
}

/// A positive amount of a token, in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount {
    base_units: U256,
    decimals: u8,
}

impl TokenAmount {
    /// Parses a decimal string for a token with `decimals` precision.
    ///
    /// Only ASCII digits and a single `.` are accepted. Trailing fractional
    /// zeros do not count towards the precision limit, so `"5.0000000"` is a
    /// valid 6-decimals amount. Zero is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError`] if the text is empty, not a plain decimal,
    /// more precise than the token, zero, or larger than a `uint256`.
    pub fn parse(amount: &str, decimals: u8) -> Result<Self, AmountError> {
        let amount = amount.trim();
        if amount.is_empty() {
            return Err(AmountError::Empty);
        }
        if !is_plain_decimal(amount) {
            return Err(AmountError::Invalid(amount.to_owned()));
        }

        let (int_part, frac_part) = amount.split_once('.').unwrap_or((amount, ""));
        let frac_part = frac_part.trim_end_matches('0');
        let precision = usize::from(decimals);
        if frac_part.len() > precision {
            return Err(AmountError::TooPrecise {
                amount: amount.to_owned(),
                decimals,
            });
        }

        // Right-pad the fraction so the digits read as a base-unit integer.
        let digits = format!("{int_part}{frac_part:0<precision$}");
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Err(AmountError::Zero);
        }
        let base_units = U256::from_str_radix(digits, 10)
            .map_err(|_| AmountError::OutOfRange(amount.to_owned()))?;

        Ok(Self {
            base_units,
            decimals,
        })
    }

    /// The amount in the token's smallest indivisible unit.
    #[must_use]
    pub const fn base_units(&self) -> U256 {
        self.base_units
    }

    /// The token precision this amount was parsed for.
    #[must_use]
    pub const fn decimals(&self) -> u8 {
        self.decimals
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_units(self.base_units, self.decimals))
    }
}

fn is_plain_decimal(s: &str) -> bool {
    let mut dots = 0;
    let mut digits = 0;
    for c in s.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

/// Formats a base-unit amount as a human-readable decimal string.
///
/// Trailing fractional zeros are dropped: `format_units(1_500_000, 6)` is `"1.5"`.
#[must_use]
pub fn format_units(base_units: U256, decimals: u8) -> String {
    let digits = base_units.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return digits;
    }
    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part.to_owned()
    } else {
        format!("{int_part}.{frac_part}")
    }
}

impl FromStr for TokenAmount {
    type Err = AmountError;

    /// Parses an amount for the default 6-decimals payment token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, crate::session::DEFAULT_TOKEN_DECIMALS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_amount() {
        let amount = TokenAmount::parse("5", 6).unwrap();
        assert_eq!(amount.base_units(), U256::from(5_000_000u64));
    }

    #[test]
    fn test_parse_fractional_amount() {
        let amount = TokenAmount::parse("1.5", 6).unwrap();
        assert_eq!(amount.base_units(), U256::from(1_500_000u64));
        let amount = TokenAmount::parse("0.000001", 6).unwrap();
        assert_eq!(amount.base_units(), U256::from(1u64));
        let amount = TokenAmount::parse(".25", 2).unwrap();
        assert_eq!(amount.base_units(), U256::from(25u64));
    }

    #[test]
    fn test_parse_trailing_zeros_do_not_count() {
        let amount = TokenAmount::parse("5.0000000", 6).unwrap();
        assert_eq!(amount.base_units(), U256::from(5_000_000u64));
    }

    #[test]
    fn test_parse_eighteen_decimals() {
        let amount = TokenAmount::parse("1", 18).unwrap();
        assert_eq!(amount.base_units(), U256::from(10u64).pow(U256::from(18u64)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(TokenAmount::parse("", 6), Err(AmountError::Empty));
        for bad in ["-1", "1,000", "1.2.3", "abc", "1e6", ".", "$5", "+5"] {
            assert!(
                matches!(TokenAmount::parse(bad, 6), Err(AmountError::Invalid(_))),
                "expected Invalid for {bad:?}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_excess_precision() {
        assert!(matches!(
            TokenAmount::parse("0.0000001", 6),
            Err(AmountError::TooPrecise { decimals: 6, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        let huge = "9".repeat(80);
        assert!(matches!(
            TokenAmount::parse(&huge, 6),
            Err(AmountError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_parse_beyond_decimal_mantissa() {
        // 2^96 whole tokens still fit comfortably in a uint256.
        let amount = TokenAmount::parse("79228162514264337593543950336", 6).unwrap();
        let expected = (U256::from(1u8) << 96) * U256::from(1_000_000u64);
        assert_eq!(amount.base_units(), expected);

        let amount = TokenAmount::parse("1.00000000000000000000000000000", 6).unwrap();
        assert_eq!(amount.base_units(), U256::from(1_000_000u64));
        assert_eq!(amount.to_string(), "1");
    }

    #[test]
    fn test_parse_uint256_boundary() {
        let max = U256::MAX.to_string();
        assert_eq!(TokenAmount::parse(&max, 0).unwrap().base_units(), U256::MAX);
        assert!(matches!(
            TokenAmount::parse(&max, 1),
            Err(AmountError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_parse_rejects_zero() {
        for zero in ["0", "0.000", ".0", "000"] {
            assert_eq!(TokenAmount::parse(zero, 6), Err(AmountError::Zero), "{zero:?}");
        }
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(TokenAmount::parse("007.50", 6).unwrap().to_string(), "7.5");
    }

    #[test]
    fn test_from_str_uses_default_decimals() {
        let amount: TokenAmount = "10".parse().unwrap();
        assert_eq!(amount.decimals(), 6);
        assert_eq!(amount.base_units(), U256::from(10_000_000u64));
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(format_units(U256::from(5_000_000u64), 6), "5");
        assert_eq!(format_units(U256::from(1u64), 6), "0.000001");
        assert_eq!(format_units(U256::ZERO, 6), "0");
        assert_eq!(format_units(U256::from(42u64), 0), "42");
    }
}
