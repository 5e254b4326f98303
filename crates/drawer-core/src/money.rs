//! # Money Module
//!
//! Provides the `Money` type for cash amounts in a drawer.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Counting a drawer in floating point:                                   │
//! │    3 dimes = 0.1 + 0.1 + 0.1 = 0.30000000000000004  ❌                  │
//! │                                                                         │
//! │  A greedy removal on such a total ends with "$0.00 left over"          │
//! │  warnings, or skips a penny it should have taken.                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    3 dimes = 10 + 10 + 10 = 30 cents, exactly                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Decimal strings only appear at the edges: see
//! [`parse_amount`](crate::validation::parse_amount) for input and the
//! `Display` impl for output.
//!
//! ## Usage
//! ```rust
//! use drawer_core::money::Money;
//!
//! let quarter = Money::from_cents(25);
//! let roll = quarter * 40;            // $10.00
//! assert_eq!(roll.to_string(), "$10.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// Signed so that differences (`total - target`) can be represented
/// directly. Serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use drawer_core::money::Money;
    ///
    /// let total = Money::from_cents(12050); // $120.50
    /// assert_eq!(total.cents(), 12050);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole dollars.
    #[inline]
    pub const fn from_dollars(dollars: i64) -> Self {
        Money(dollars * 100)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion (truncated toward zero).
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies a face value by a piece count.
    ///
    /// ## Example
    /// ```rust
    /// use drawer_core::money::Money;
    ///
    /// let dime = Money::from_cents(10);
    /// assert_eq!(dime.times(7).cents(), 70);
    /// ```
    #[inline]
    pub const fn times(&self, count: i64) -> Self {
        Money(self.0 * count)
    }

    /// How many whole `unit`s fit into this amount.
    ///
    /// Returns 0 for a non-positive unit or a negative amount.
    ///
    /// ## Example
    /// ```rust
    /// use drawer_core::money::Money;
    ///
    /// let remaining = Money::from_cents(2050);
    /// assert_eq!(remaining.whole_units_of(Money::from_cents(2000)), 1);
    /// assert_eq!(remaining.whole_units_of(Money::from_cents(25)), 82);
    /// ```
    #[inline]
    pub const fn whole_units_of(&self, unit: Money) -> i64 {
        if unit.0 <= 0 || self.0 < 0 {
            0
        } else {
            self.0 / unit.0
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Formats as `$120.50`, `-$3.05`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a piece count.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: i64) -> Self {
        Money(self.0 * count)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
