//! Passenger insurance, payout crediting and withdrawal.

use super::app::SuretyApp;
use crate::domain::amount::{Amount, Balance};
use crate::domain::flight::FlightId;
use crate::domain::identity::Identity;
use crate::domain::policy::{InsurancePolicy, PassengerAccount};
use crate::domain::ports::{ChangeSet, FundsTransfer};
use crate::error::{Result, SuretyError};
use rust_decimal::Decimal;
use tracing::{error, info};

impl SuretyApp {
    /// Opens an account for `passenger` if there is none yet.
    ///
    /// With `grant_default_balance_on_registration` a new account starts
    /// with `default_passenger_balance` of withdrawable credit.
    pub async fn register_passenger(
        &self,
        passenger: &Identity,
        flight_id: &FlightId,
        caller: &Identity,
    ) -> Result<PassengerAccount> {
        let _call = self.data.begin_call().await;
        self.guard().await?;
        self.require_flight(flight_id).await?;

        if let Some(account) = self.data.passenger(passenger).await? {
            return Ok(account);
        }

        let mut account = PassengerAccount::new(passenger.clone());
        if self.config.grant_default_balance_on_registration {
            account.withdrawable = self.config.default_passenger_balance;
        }
        self.data
            .commit(
                &self.identity,
                ChangeSet {
                    passengers: vec![account.clone()],
                    ..ChangeSet::default()
                },
            )
            .await?;

        info!(%passenger, flight = %flight_id, registrar = %caller, "passenger registered");
        Ok(account)
    }

    pub async fn buy_flight_insurance(
        &self,
        passenger: &Identity,
        flight_id: &FlightId,
        premium: Decimal,
        caller: &Identity,
    ) -> Result<InsurancePolicy> {
        let _call = self.data.begin_call().await;
        self.guard().await?;
        self.require_flight(flight_id).await?;

        if self.data.policy(passenger, flight_id).await?.is_some() {
            return Err(SuretyError::DuplicatePolicy {
                passenger: passenger.clone(),
                flight: flight_id.to_hex(),
            });
        }
        let premium = self.validate_premium(premium)?;

        let policy = InsurancePolicy::new(passenger.clone(), *flight_id, premium);
        let mut changes = ChangeSet {
            policies: vec![policy.clone()],
            ..ChangeSet::default()
        };
        if self.data.passenger(passenger).await?.is_none() {
            changes.passengers.push(PassengerAccount::new(passenger.clone()));
        }
        self.data.commit(&self.identity, changes).await?;

        info!(%passenger, flight = %flight_id, premium = %Balance::from(premium), payer = %caller, "insurance purchased");
        Ok(policy)
    }

    /// Withdraws the caller's whole withdrawable balance.
    ///
    /// The balance is zeroed and committed before `transfer` runs, and the
    /// call lock is released first, so a transfer that calls back into the
    /// ledger only ever sees the drained account. If the transfer fails
    /// the balance stays at zero and `TransferFailed` reports the amount
    /// for out-of-band settlement.
    pub async fn payout_funds(
        &self,
        caller: &Identity,
        transfer: &dyn FundsTransfer,
    ) -> Result<Balance> {
        let call = self.data.begin_call().await;
        self.guard().await?;

        let Some(mut account) = self.data.passenger(caller).await? else {
            return Ok(Balance::ZERO);
        };
        let amount = account.drain();
        if amount.is_zero() {
            return Ok(Balance::ZERO);
        }
        self.data
            .commit(
                &self.identity,
                ChangeSet {
                    passengers: vec![account],
                    ..ChangeSet::default()
                },
            )
            .await?;
        drop(call);

        if let Err(e) = transfer.transfer(caller, amount).await {
            error!(passenger = %caller, %amount, error = %e, "payout transfer failed, balance left at zero");
            return Err(SuretyError::TransferFailed {
                passenger: caller.clone(),
                amount,
                reason: e.to_string(),
            });
        }

        info!(passenger = %caller, %amount, "payout withdrawn");
        Ok(amount)
    }

    /// Same as [`SuretyApp::payout_funds`].
    pub async fn collect_funds(
        &self,
        caller: &Identity,
        transfer: &dyn FundsTransfer,
    ) -> Result<Balance> {
        self.payout_funds(caller, transfer).await
    }

    pub async fn passenger_has_insurance(
        &self,
        passenger: &Identity,
        flight_id: &FlightId,
    ) -> Result<bool> {
        Ok(self.data.policy(passenger, flight_id).await?.is_some())
    }

    /// Whether the passenger was ever credited a payout, withdrawn or not.
    pub async fn passenger_was_paid_insurance(&self, passenger: &Identity) -> Result<bool> {
        Ok(self
            .data
            .passenger(passenger)
            .await?
            .is_some_and(|a| a.ever_paid))
    }

    /// Whether the passenger has an account.
    pub async fn passenger_status(&self, passenger: &Identity) -> Result<bool> {
        Ok(self.data.passenger(passenger).await?.is_some())
    }

    pub async fn withdrawable_balance(&self, passenger: &Identity) -> Result<Balance> {
        Ok(self
            .data
            .passenger(passenger)
            .await?
            .map(|a| a.withdrawable)
            .unwrap_or_default())
    }

    /// Stages a payout for every uncredited policy on `flight_id`.
    pub(crate) async fn stage_payouts(
        &self,
        flight_id: &FlightId,
        changes: &mut ChangeSet,
    ) -> Result<usize> {
        let mut credited = 0;
        for mut policy in self.data.policies_for_flight(flight_id).await? {
            if policy.payout_credited {
                continue;
            }
            let payout = policy.payout_amount(self.config.payout_multiplier)?;
            let mut account = self
                .data
                .passenger(&policy.passenger)
                .await?
                .unwrap_or_else(|| PassengerAccount::new(policy.passenger.clone()));
            account.credit_payout(payout)?;
            policy.payout_credited = true;

            info!(passenger = %policy.passenger, flight = %flight_id, %payout, "payout credited");
            changes.passengers.push(account);
            changes.policies.push(policy);
            credited += 1;
        }
        Ok(credited)
    }

    async fn require_flight(&self, flight_id: &FlightId) -> Result<()> {
        match self.data.flight(flight_id).await? {
            Some(_) => Ok(()),
            None => Err(SuretyError::UnknownFlight(flight_id.to_hex())),
        }
    }

    fn validate_premium(&self, premium: Decimal) -> Result<Amount> {
        let amount = Amount::new(premium)
            .map_err(|_| SuretyError::InvalidPremium(format!("{} must be positive", premium)))?;
        if let Some(cap) = self.config.max_premium {
            if Balance::from(amount) > cap {
                return Err(SuretyError::InvalidPremium(format!(
                    "{} exceeds the maximum of {}",
                    premium, cap
                )));
            }
        }
        Ok(amount)
    }
}
