use super::amount::{Amount, Balance};
use super::flight::FlightId;
use super::identity::Identity;
use crate::error::SuretyError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Delay insurance held by one passenger on one flight.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct InsurancePolicy {
    pub passenger: Identity,
    pub flight_id: FlightId,
    pub premium: Amount,
    pub payout_credited: bool,
}

impl InsurancePolicy {
    pub fn new(passenger: Identity, flight_id: FlightId, premium: Amount) -> Self {
        Self {
            passenger,
            flight_id,
            premium,
            payout_credited: false,
        }
    }

    pub fn payout_amount(&self, multiplier: Decimal) -> Result<Balance, SuretyError> {
        Balance::from(self.premium).checked_scaled(multiplier)
    }
}

/// Withdrawable credit owed to a passenger.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PassengerAccount {
    pub identity: Identity,
    pub withdrawable: Balance,
    /// Set on the first payout credit and never cleared, so it survives
    /// withdrawals.
    pub ever_paid: bool,
}

impl PassengerAccount {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            withdrawable: Balance::ZERO,
            ever_paid: false,
        }
    }

    pub fn credit_payout(&mut self, amount: Balance) -> Result<(), SuretyError> {
        self.withdrawable = self.withdrawable.checked_add(amount)?;
        self.ever_paid = true;
        Ok(())
    }

    /// Empties the withdrawable balance and returns what was there.
    pub fn drain(&mut self) -> Balance {
        std::mem::take(&mut self.withdrawable)
    }
}
