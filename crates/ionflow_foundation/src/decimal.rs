//! Arbitrary-precision decimals.
//!
//! A decimal is `coefficient * 10^exponent`. Precision is significant:
//! `1.0` (coefficient 10, exponent -1) and `1.00` are different values.
//! Zero carries a sign, so `-0.` and `0.` are also different.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::int::Int;

/// Decimal value with explicit precision.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Decimal {
    coefficient: Int,
    exponent: i64,
    negative_zero: bool,
}

impl Decimal {
    /// Creates a decimal from a coefficient and exponent.
    #[must_use]
    pub fn new(coefficient: impl Into<Int>, exponent: i64) -> Self {
        Self {
            coefficient: coefficient.into(),
            exponent,
            negative_zero: false,
        }
    }

    /// Creates a negative zero with the given exponent.
    #[must_use]
    pub fn negative_zero(exponent: i64) -> Self {
        Self {
            coefficient: Int::I64(0),
            exponent,
            negative_zero: true,
        }
    }

    /// Returns the coefficient.
    #[must_use]
    pub const fn coefficient(&self) -> &Int {
        &self.coefficient
    }

    /// Returns the exponent.
    #[must_use]
    pub const fn exponent(&self) -> i64 {
        self.exponent
    }

    /// Returns true if this value is zero of either sign.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    /// Returns true if this value is negative zero.
    #[must_use]
    pub fn is_negative_zero(&self) -> bool {
        self.negative_zero && self.coefficient.is_zero()
    }

    /// Returns true if the sign bit is set (negative values and negative zero).
    #[must_use]
    pub fn is_sign_negative(&self) -> bool {
        self.is_negative_zero() || self.coefficient.is_negative()
    }

    /// Converts to the nearest `f64`.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        let text = format!("{}e{}", self.coefficient, self.exponent);
        let value = text.parse::<f64>().unwrap_or(0.0);
        if self.is_negative_zero() { -0.0 } else { value }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative_zero() {
            f.write_str("-")?;
        }
        write!(f, "{}d{}", self.coefficient, self.exponent)
    }
}

/// Error returned when decimal text is malformed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseDecimalError(pub String);

impl fmt::Display for ParseDecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid decimal: {}", self.0)
    }
}

impl std::error::Error for ParseDecimalError {}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Parses `[-]digits[.digits][(d|D)[+|-]digits]`, with `_` allowed between digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDecimalError(s.to_string());
        let cleaned: String = s.chars().filter(|&c| c != '_').collect();
        let (negative, body) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };

        let (mantissa, exp_text) = match body.find(['d', 'D']) {
            Some(i) => (&body[..i], Some(&body[i + 1..])),
            None => (body, None),
        };
        let mut exponent: i64 = match exp_text {
            Some(e) if !e.is_empty() => e.parse().map_err(|_| err())?,
            Some(_) => return Err(err()),
            None => 0,
        };

        let (int_part, frac_part) = match mantissa.find('.') {
            Some(i) => (&mantissa[..i], &mantissa[i + 1..]),
            None => (mantissa, ""),
        };
        if int_part.is_empty()
            || !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }
        let frac_len = i64::try_from(frac_part.len()).map_err(|_| err())?;
        exponent = exponent.checked_sub(frac_len).ok_or_else(err)?;

        let digits = format!("{int_part}{frac_part}");
        let mut magnitude: BigInt = digits.parse().map_err(|_| err())?;
        if negative {
            magnitude = -magnitude;
        }
        let coefficient = Int::from(magnitude);
        if negative && coefficient.is_zero() {
            Ok(Self::negative_zero(exponent))
        } else {
            Ok(Self::new(coefficient, exponent))
        }
    }
}
