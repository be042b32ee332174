//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    10.00 - 9.99 = 0.009999999999999787  ❌ WRONG!                       │
//! │                                                                         │
//! │  OUR SOLUTION: Base-10 Decimal                                          │
//! │    10.00 - 9.99 = 0.01                   ✅ exact                       │
//! │    Every value keeps the scale it was entered with                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::money::Money;
//!
//! // Create from cents or parse a decimal string
//! let price = Money::from_cents(1099); // 10.99
//! let tendered: Money = "20.00".parse().unwrap();
//!
//! // Checked arithmetic: `None` when the result does not fit
//! let doubled = price.checked_multiply_quantity(2); // Some(21.98)
//! let change = tendered.checked_sub(price);         // Some(9.01)
//! assert_eq!(doubled, Some(Money::from_cents(2198)));
//! assert_eq!(change, Some(Money::from_cents(901)));
//! ```
//!
//! The operators (`+`, `-`) panic on overflow like `Decimal` itself. Order
//! totals and change go through the `checked_*` methods, because prices and
//! quantities are unbounded on input.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value as an exact base-10 decimal.
///
/// ## Design Decisions
/// - **Decimal (signed)**: Allows negative intermediate values (e.g. change
///   on an underpaid order is computed before it is rejected)
/// - **Single field tuple struct**: Zero-cost abstraction over `Decimal`
/// - **Numeric equality**: `10.0 == 10.00`
/// - **Serde**: Serialized as a decimal string, so JSON never carries a float
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Item.price ──► LineItem.price (snapshot) ──► × quantity ──► line total │
/// │                                                                         │
/// │  Σ line totals ──► Order.total() ──► pay(payment) ──► Receipt.change() │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money value from cents (two fractional digits).
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Wraps an existing decimal without changing its scale.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiplies money by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1000); // 10.00
    /// let line_total = unit_price.checked_multiply_quantity(23);
    /// assert_eq!(line_total, Some(Money::from_cents(23000))); // 230.00
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    #[inline]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Sums the values, `None` as soon as a partial sum overflows.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(values: I) -> Option<Self> {
        values
            .into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows at least two fractional digits. Values stored with a larger
/// scale are printed in full.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.0;
        if value.scale() < 2 {
            value.rescale(2);
        }
        write!(f, "{}", value)
    }
}

/// Parse error for money strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid money amount: '{0}'")]
pub struct ParseMoneyError(String);

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Money)
            .map_err(|_| ParseMoneyError(s.to_string()))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

/// Default money is zero.
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


// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.amount(), dec!(10.99));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_decimal(dec!(5)).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
        // Larger scales are never rounded away
        assert_eq!(Money::from_decimal(dec!(0.125)).to_string(), "0.125");
    }

    #[test]
    fn test_parse() {
        assert_eq!("10.00".parse::<Money>().unwrap(), Money::from_cents(1000));
        assert_eq!(" 3.5 ".parse::<Money>().unwrap(), Money::from_cents(350));
        assert!("ten".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a + b, Money::from_cents(1500));
        assert_eq!(a - b, Money::from_cents(500));
        assert_eq!(a.checked_multiply_quantity(3), Some(Money::from_cents(3000)));

        let mut c = a;
        c += b;
        c -= Money::from_cents(250);
        assert_eq!(c, Money::from_cents(1250));
    }

    /// Critical test: the subtraction that breaks binary floats is exact here.
    #[test]
    fn test_decimal_subtraction_is_exact() {
        let ten = Money::from_decimal(dec!(10.00));
        let price = Money::from_decimal(dec!(9.99));
        assert_eq!(ten - price, Money::from_decimal(dec!(0.01)));
        assert_eq!((ten - price).to_string(), "0.01");
    }

    #[test]
    fn test_numeric_equality_ignores_scale() {
        assert_eq!(Money::from_decimal(dec!(10)), Money::from_decimal(dec!(10.00)));
        assert!(Money::from_decimal(dec!(10.01)) > Money::from_decimal(dec!(10)));
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert!(!negative.is_positive());
    }

    #[test]
    fn test_checked_sum() {
        let total = Money::checked_sum([Money::from_cents(100), Money::from_cents(250)]);
        assert_eq!(total, Some(Money::from_cents(350)));

        assert_eq!(Money::checked_sum([]), Some(Money::zero()));
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let huge = Money::from_decimal(Decimal::MAX);
        let big: Money = "100000000000000000000".parse().unwrap();

        assert_eq!(big.checked_multiply_quantity(1_000_000_000), None);
        assert_eq!(huge.checked_add(Money::from_decimal(Decimal::ONE)), None);
        assert_eq!(
            Money::from_decimal(Decimal::MIN).checked_sub(Money::from_decimal(Decimal::ONE)),
            None
        );
        assert_eq!(Money::checked_sum([huge, huge]), None);

        assert_eq!(
            big.checked_multiply_quantity(3),
            Some("300000000000000000000".parse().unwrap())
        );
    }

    #[test]
    fn test_serde_accepts_string_and_number() {
        let from_string: Money = serde_json::from_str("\"10.01\"").unwrap();
        assert_eq!(from_string, Money::from_cents(1001));

        let from_number: Money = serde_json::from_str("300").unwrap();
        assert_eq!(from_number, Money::from_cents(30000));

        let json = serde_json::to_string(&Money::from_cents(7000)).unwrap();
        assert_eq!(json, "\"70.00\"");
    }
}
