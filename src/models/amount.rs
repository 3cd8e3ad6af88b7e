//! Amount type for budget figures
//!
//! Budget books publish every figure in thousand-yen units, so the stored
//! integer is kept as-is and only converted for display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::format;

/// A budget amount in thousand-yen (千円)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    /// Create an amount from a thousand-yen figure
    pub const fn from_thousands(thousands: i64) -> Self {
        Self(thousands)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the raw thousand-yen figure
    pub const fn thousands(&self) -> i64 {
        self.0
    }

    /// Get the amount in whole yen
    pub const fn yen(&self) -> i64 {
        self.0 * 1000
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Readable form, e.g. "5.0億円" (or "5.0億" when `short`)
    pub fn format(&self, short: bool) -> String {
        format::format_amount(self.0, short)
    }

    /// Readable signed difference, e.g. "+2,000万円"
    pub fn format_diff(&self, short: bool) -> String {
        format::format_diff(self.0, short)
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

impl From<i64> for Amount {
    fn from(thousands: i64) -> Self {
        Self(thousands)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, a| acc + a)
    }
}

impl<'a> std::iter::Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
