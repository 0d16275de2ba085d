//! Type-safe price representation in the smallest currency unit.
//!
//! Prices are whole numbers: the storefront sells in Indonesian rupiah, which
//! has no fractional unit in everyday use. Arithmetic saturates so a
//! pathological quantity can never wrap a total around to a small number.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// ISO 4217 code shown in front of every amount.
pub const CURRENCY: &str = "IDR";

/// A non-negative amount of money in the smallest currency unit.
///
/// Serializes as a bare JSON number, which is also how the persisted cart
/// stores unit prices.
///
/// ```
/// use warung_core::Price;
///
/// let burger = Price::new(25_000);
/// assert_eq!(burger.times(2), Price::new(50_000));
/// assert_eq!(burger.to_string(), "IDR 25.000");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(0);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Get the raw amount.
    #[must_use]
    pub const fn amount(&self) -> u64 {
        self.0
    }

    /// Multiply by a quantity, saturating at `u64::MAX`.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    /// Subtract, stopping at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY} {}", group_thousands(self.0))
    }
}

/// Error parsing a [`Price`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount {0:?}: expected a whole number such as 25000 or 25.000")]
pub struct ParsePriceError(String);

impl FromStr for Price {
    type Err = ParsePriceError;

    /// Parse an amount as typed at the till.
    ///
    /// Accepts `25000`, `25.000`, `25,000` and `25 000`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '.' | ',' | ' '))
            .collect();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParsePriceError(s.to_string()));
        }
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ParsePriceError(s.to_string()))
    }
}

/// Group digits in threes with `.` separators, as the `id-ID` locale does.
fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
