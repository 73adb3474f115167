use crate::error::SuretyError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A ledger balance in funding units.
///
/// Wraps `rust_decimal::Decimal` so that premium multipliers such as 1.5x
/// stay exact instead of drifting through floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(pub Decimal);

/// A strictly positive amount carried by a call (funding, premium).
///
/// Deserialization goes through [`Amount::new`], so a stored premium can
/// never come back as zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, SuretyError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(SuretyError::InvalidAmount(format!(
                "{} must be positive",
                value
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = SuretyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Adds `rhs`, failing with `InvalidAmount` instead of overflowing.
    pub fn checked_add(self, rhs: Self) -> Result<Self, SuretyError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or_else(|| SuretyError::InvalidAmount(format!("{} + {} overflows", self, rhs)))
    }

    /// Scales the balance by a plain multiplier, e.g. the payout rate.
    pub fn checked_scaled(self, factor: Decimal) -> Result<Self, SuretyError> {
        self.0.checked_mul(factor).map(Self).ok_or_else(|| {
            SuretyError::InvalidAmount(format!("{} x {} overflows", self, factor.normalize()))
        })
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}
