//! Integer minor-unit money and the fixed denomination table.

pub mod denomination;

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::errors::{ChallengeError, Result};

pub use denomination::{
    default_selection, denomination_by_id, denomination_by_value, denominations,
    resolve_denominations, Denomination, DenominationKind,
};

/// Millimes per dinar.
pub const MINOR_UNITS_PER_MAJOR: i64 = 1000;
/// Fractional digits used whenever an amount crosses the text boundary.
pub const FRACTION_DIGITS: usize = 3;

const MAJOR_SYMBOL: &str = "د.ت";
const MINOR_SYMBOL: &str = "مليم";

/// A monetary value stored as an exact count of millimes.
///
/// Every amount in goals, batches, and the persisted document is an `Amount`;
/// decimals only exist while parsing user input or rendering output.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_millimes(millimes: i64) -> Self {
        Amount(millimes)
    }

    pub const fn from_dinars(dinars: i64) -> Self {
        Amount(dinars * MINOR_UNITS_PER_MAJOR)
    }

    pub const fn millimes(self) -> i64 {
        self.0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn checked_mul(self, count: u32) -> Option<Amount> {
        self.0.checked_mul(i64::from(count)).map(Amount)
    }

    /// Parses decimal text such as `12`, `12.5` or `0.0305` into millimes.
    ///
    /// Digits past the third fractional place round to the nearest millime,
    /// halves rounding up.
    pub fn parse(text: &str) -> Result<Self> {
        let raw = text.trim();
        let invalid = || ChallengeError::InvalidAmount(raw.to_string());

        let (whole, fraction) = match raw.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (raw, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let mut millimes: i64 = 0;
        for digit in whole.bytes() {
            millimes = millimes
                .checked_mul(10)
                .and_then(|value| value.checked_add(i64::from(digit - b'0')))
                .ok_or_else(invalid)?;
        }
        millimes = millimes
            .checked_mul(MINOR_UNITS_PER_MAJOR)
            .ok_or_else(invalid)?;

        let digits = fraction.as_bytes();
        let mut minor: i64 = 0;
        for place in 0..FRACTION_DIGITS {
            let digit = digits.get(place).map(|d| i64::from(d - b'0')).unwrap_or(0);
            minor = minor * 10 + digit;
        }
        if digits.get(FRACTION_DIGITS).is_some_and(|d| *d >= b'5') {
            minor += 1;
        }

        millimes.checked_add(minor).map(Amount).ok_or_else(invalid)
    }

    /// Renders the amount as a decimal with exactly three fractional digits.
    pub fn to_decimal_string(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let per_major = MINOR_UNITS_PER_MAJOR.unsigned_abs();
        format!(
            "{sign}{}.{:03}",
            magnitude / per_major,
            magnitude % per_major
        )
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl FromStr for Amount {
    type Err = ChallengeError;

    fn from_str(s: &str) -> Result<Self> {
        Amount::parse(s)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        self.0 -= rhs.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}

/// Formats an amount for display: millimes below one dinar, dinars otherwise.
pub fn format_currency(amount: Amount) -> String {
    if amount.millimes().abs() < MINOR_UNITS_PER_MAJOR {
        format!("{} {}", amount.millimes(), MINOR_SYMBOL)
    } else {
        format!("{} {}", amount.to_decimal_string(), MAJOR_SYMBOL)
    }
}
