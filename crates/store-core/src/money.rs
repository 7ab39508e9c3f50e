//! # Money Module
//!
//! Provides the `Money` type for prices, line subtotals and order totals.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Order totals are accumulated one delta at a time, so any drift        │
//! │  compounds with every AddProductToOrder call.                          │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal, two fractional digits                   │
//! │    PostgreSQL NUMERIC(12,2)  <──►  rust_decimal::Decimal               │
//! │    2.00 × 7 = 14.00, exactly                                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use store_core::money::Money;
//!
//! let price: Money = "2.00".parse().unwrap();
//! let line = price.multiply_quantity(7).unwrap();
//! assert_eq!(line.to_string(), "14.00");
//!
//! // At most two fractional digits
//! assert!("1.005".parse::<Money>().is_err());
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;

/// Number of fractional digits every stored amount carries.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a `NUMERIC(12,2)` column holds, in cents (9,999,999,999.99).
pub const MONEY_MAX_CENTS: i64 = 999_999_999_999;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount with exact decimal arithmetic.
///
/// ## Design Decisions
/// - **Decimal, not f64**: sums and differences are exact
/// - **Signed**: an order-total delta is negative when a line is repriced down
/// - **Transparent serde**: JSON sees a decimal string such as `"14.00"`
///
/// ## Where Money Flows
/// ```text
/// Product.price ──► OrderItem.sub_total = price × quantity
///                          │
///                          ▼
///              delta = new sub_total − old sub_total
///                          │
///                          ▼
///              Order.total_price += delta
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(value_type = String, example = "14.00"))]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount as-is.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates an amount from a whole number of cents.
    ///
    /// ```rust
    /// use store_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).to_string(), "10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, MONEY_SCALE))
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero, at the standard scale.
    #[inline]
    pub fn zero() -> Self {
        Money(Decimal::new(0, MONEY_SCALE))
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// Returns `None` if the result does not fit in a `Decimal`.
    ///
    /// ## Example
    /// ```rust
    /// use store_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// let line_total = unit_price.multiply_quantity(3).unwrap();
    /// assert_eq!(line_total, Money::from_cents(897));
    /// ```
    pub fn multiply_quantity(&self, qty: i32) -> Option<Money> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// The largest amount that can be stored.
    #[inline]
    pub fn column_max() -> Self {
        Money::from_cents(MONEY_MAX_CENTS)
    }

    /// True if the magnitude fits the price and total columns.
    ///
    /// ```rust
    /// use store_core::money::Money;
    ///
    /// assert!(Money::from_cents(999_999_999_999).fits_column());
    /// assert!(!Money::from_cents(1_000_000_000_000).fits_column());
    /// ```
    pub fn fits_column(&self) -> bool {
        self.0.abs() <= Self::column_max().0
    }

    /// Sum `self + other`, or `None` on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Difference `self - other`, or `None` on overflow.
    pub fn checked_sub(&self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a decimal string, rejecting more than two fractional digits.
///
/// The result is rescaled so `"2"` and `"2.0"` both become `2.00`.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut amount = Decimal::from_str(s.trim()).map_err(|e| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: e.to_string(),
        })?;

        if amount.scale() > MONEY_SCALE {
            amount = amount.normalize();
            if amount.scale() > MONEY_SCALE {
                return Err(ValidationError::InvalidFormat {
                    field: "amount".to_string(),
                    reason: format!("at most {MONEY_SCALE} decimal places allowed"),
                });
            }
        }

        amount.rescale(MONEY_SCALE);
        Ok(Money(amount))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
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

    #[test]
    fn test_from_cents() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }

    #[test]
    fn test_parse_rescales() {
        let whole: Money = "2".parse().unwrap();
        assert_eq!(whole.to_string(), "2.00");

        let one_digit: Money = " 2.5 ".parse().unwrap();
        assert_eq!(one_digit.to_string(), "2.50");

        // Trailing zeros beyond the scale are harmless
        let padded: Money = "3.1000".parse().unwrap();
        assert_eq!(padded.to_string(), "3.10");
    }

    #[test]
    fn test_parse_rejects_sub_cent_amounts() {
        assert!("1.005".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(250);

        assert_eq!(a + b, Money::from_cents(1250));
        assert_eq!(a - b, Money::from_cents(750));

        let mut total = Money::zero();
        total += a;
        total -= b;
        assert_eq!(total, Money::from_cents(750));
    }

    #[test]
    fn test_multiply_quantity_is_exact() {
        let price = Money::from_cents(10);
        // 0.10 × 3 must be 0.30, never 0.30000000000000004
        assert_eq!(price.multiply_quantity(3), Some(Money::from_cents(30)));
        assert_eq!(
            Money::from_cents(200).multiply_quantity(7).unwrap().to_string(),
            "14.00"
        );
    }

    #[test]
    fn test_multiply_quantity_overflow() {
        let huge = Money::from_decimal(Decimal::MAX);
        assert_eq!(huge.multiply_quantity(2), None);
    }

    #[test]
    fn test_column_bounds() {
        assert!(Money::zero().fits_column());
        assert!(Money::column_max().fits_column());
        assert!(Money::from_cents(-MONEY_MAX_CENTS).fits_column());

        let one_cent_over = Money::column_max().checked_add(Money::from_cents(1)).unwrap();
        assert!(!one_cent_over.fits_column());
        assert_eq!(one_cent_over.to_string(), "10000000000.00");
    }

    #[test]
    fn test_zero_and_sign() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_negative());
        assert!(Money::from_cents(-1).is_negative());
        assert!(!Money::from_cents(1).is_negative());
    }

    #[test]
    fn test_serializes_as_decimal_string() {
        let json = serde_json::to_string(&Money::from_cents(1400)).unwrap();
        assert_eq!(json, "\"14.00\"");

        let back: Money = serde_json::from_str("\"14.00\"").unwrap();
        assert_eq!(back, Money::from_cents(1400));
    }
}
