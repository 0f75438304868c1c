//! A positive amount of money with cent precision.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;

/// The number of decimal places stored for an amount.
const DECIMAL_PLACES: u32 = 2;

/// The number of digits allowed before the decimal point.
const MAX_WHOLE_DIGITS: u32 = 8;

/// Why an amount was rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AmountError {
    /// The text is not a decimal number.
    #[error("Enter a number.")]
    NotANumber,
    /// The amount is zero or negative.
    #[error("Ensure this value is greater than zero.")]
    NotPositive,
    /// The amount has fractions of a cent.
    #[error("Ensure that there are no more than 2 decimal places.")]
    TooPrecise,
    /// The amount is too large to store.
    #[error("Ensure that there are no more than 8 digits before the decimal point.")]
    TooLarge,
}

/// An amount of money that is greater than zero and has at most two decimal places.
///
/// Amounts are stored as decimal text so that sums never pick up binary
/// floating point error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    /// Create an amount from a decimal number.
    ///
    /// # Errors
    ///
    /// Returns an [AmountError] if `amount` is not positive, has more than two
    /// decimal places or has more than eight digits before the decimal point.
    pub fn new(amount: Decimal) -> Result<Self, AmountError> {
        if amount <= Decimal::ZERO {
            return Err(AmountError::NotPositive);
        }

        if amount.normalize().scale() > DECIMAL_PLACES {
            return Err(AmountError::TooPrecise);
        }

        if amount.trunc() >= Decimal::from(10_i64.pow(MAX_WHOLE_DIGITS)) {
            return Err(AmountError::TooLarge);
        }

        let mut amount = amount;
        amount.rescale(DECIMAL_PLACES);

        Ok(Self(amount))
    }

    /// The amount as a decimal number.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Money {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| AmountError::NotANumber)?;

        Self::new(amount)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        let amount = Decimal::from_str(text).map_err(|error| FromSqlError::Other(Box::new(error)))?;

        Money::new(amount).map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}
