//! Monetary amounts stored as integer minor units.
//!
//! The HTTP surface speaks decimal major units (`19.99`); storage and all
//! arithmetic use cents so `total == price × quantity` holds exactly.

use std::fmt;

const MINOR_PER_MAJOR: i64 = 100;

/// Validation failures when constructing [`Money`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MoneyError {
    #[error("amount must not be negative")]
    Negative,
    #[error("amount must be a finite number")]
    NotFinite,
    #[error("amount is too large")]
    Overflow,
}

/// Non-negative amount of money in minor units (cents).
///
/// # Examples
/// ```
/// use storefront::domain::Money;
///
/// let price = Money::from_major(19.99).expect("valid amount");
/// assert_eq!(price.minor_units(), 1999);
/// assert_eq!(price.checked_times(3).map(|m| m.minor_units()), Some(5997));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Build from cents, rejecting negative values.
    pub fn from_minor(minor: i64) -> Result<Self, MoneyError> {
        if minor < 0 {
            return Err(MoneyError::Negative);
        }
        Ok(Self(minor))
    }

    /// Build from a decimal amount in major units, rounding to the nearest cent.
    pub fn from_major(major: f64) -> Result<Self, MoneyError> {
        if !major.is_finite() {
            return Err(MoneyError::NotFinite);
        }
        if major < 0.0 {
            return Err(MoneyError::Negative);
        }
        let minor = (major * MINOR_PER_MAJOR as f64).round();
        if minor > i64::MAX as f64 {
            return Err(MoneyError::Overflow);
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "value is finite, non-negative, and bounded by i64::MAX above"
        )]
        let cents = minor as i64;
        Ok(Self(cents))
    }

    /// Amount in cents.
    pub fn minor_units(self) -> i64 {
        self.0
    }

    /// Amount in major units for presentation on the wire.
    pub fn as_major(self) -> f64 {
        #[expect(
            clippy::cast_precision_loss,
            reason = "storefront amounts stay far below 2^53 cents"
        )]
        let cents = self.0 as f64;
        cents / MINOR_PER_MAJOR as f64
    }

    /// `self × quantity`, or `None` on overflow.
    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let major = self.0.div_euclid(MINOR_PER_MAJOR);
        let minor = self.0.rem_euclid(MINOR_PER_MAJOR);
        write!(f, "{major}.{minor:02}")
    }
}
