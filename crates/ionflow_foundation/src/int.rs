//! Arbitrary-precision integers.
//!
//! Most integers fit an `i64`; larger magnitudes fall back to `BigInt`.
//! An `Int` is always normalized: the `Big` form is used only when the
//! value is outside the `i64` range.

use std::fmt;

use num_bigint::{BigInt, Sign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer value of arbitrary size.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Int {
    /// Value within the `i64` range.
    I64(i64),
    /// Value outside the `i64` range.
    Big(BigInt),
}

impl Int {
    /// Builds an integer from a sign and big-endian magnitude octets.
    #[must_use]
    pub fn from_magnitude(negative: bool, magnitude: &[u8]) -> Self {
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        Self::from(BigInt::from_bytes_be(sign, magnitude))
    }

    /// Parses an optionally signed run of digits in `radix`.
    ///
    /// Returns `None` if the text is empty or holds a non-digit.
    #[must_use]
    pub fn from_str_radix(text: &str, radix: u32) -> Option<Self> {
        let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        BigInt::parse_bytes(text.as_bytes(), radix).map(Self::from)
    }

    /// Returns the value as `i64` if it fits.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(n) => Some(*n),
            Self::Big(_) => None,
        }
    }

    /// Returns the value as a `BigInt`.
    #[must_use]
    pub fn to_big(&self) -> BigInt {
        match self {
            Self::I64(n) => BigInt::from(*n),
            Self::Big(b) => b.clone(),
        }
    }

    /// Returns true if the value is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        match self {
            Self::I64(n) => *n < 0,
            Self::Big(b) => b.sign() == Sign::Minus,
        }
    }

    /// Returns true if the value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::I64(n) => *n == 0,
            Self::Big(b) => b.sign() == Sign::NoSign,
        }
    }

    /// Returns the big-endian magnitude octets with no leading zero octets.
    ///
    /// Zero has an empty magnitude.
    #[must_use]
    pub fn magnitude_bytes(&self) -> Vec<u8> {
        match self {
            Self::I64(n) => {
                let bytes = n.unsigned_abs().to_be_bytes();
                let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
                bytes[first..].to_vec()
            }
            Self::Big(b) => {
                let (_, bytes) = b.to_bytes_be();
                if bytes == [0] { Vec::new() } else { bytes }
            }
        }
    }
}

impl Default for Int {
    fn default() -> Self {
        Self::I64(0)
    }
}

impl From<i64> for Int {
    fn from(n: i64) -> Self {
        Self::I64(n)
    }
}

impl From<i32> for Int {
    fn from(n: i32) -> Self {
        Self::I64(i64::from(n))
    }
}

impl From<u64> for Int {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(small) => Self::I64(small),
            Err(_) => Self::Big(BigInt::from(n)),
        }
    }
}

impl From<BigInt> for Int {
    fn from(b: BigInt) -> Self {
        match i64::try_from(&b) {
            Ok(small) => Self::I64(small),
            Err(_) => Self::Big(b),
        }
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I64(n) => write!(f, "{n}"),
            Self::Big(b) => write!(f, "{b}"),
        }
    }
}
