//! Airline registration and funding.

use super::app::SuretyApp;
use crate::domain::airline::Airline;
use crate::domain::amount::{Amount, Balance};
use crate::domain::identity::Identity;
use crate::domain::ports::ChangeSet;
use crate::domain::quorum::RegistrationPhase;
use crate::error::{Result, SuretyError};
use rust_decimal::Decimal;
use tracing::info;

/// What a `register_airline` call achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    VoteRecorded { votes: usize, required: usize },
}

impl SuretyApp {
    /// Registers `candidate` on behalf of a funded airline.
    ///
    /// While fewer than `bootstrap_airline_limit` airlines are registered the
    /// candidate is registered straight away. After that each call counts as
    /// one vote, and the candidate is registered once it holds
    /// `ceil(n / 2)` votes, with `n` read at the start of the call.
    pub async fn register_airline(
        &self,
        candidate: &Identity,
        name: &str,
        caller: &Identity,
    ) -> Result<RegistrationOutcome> {
        let _call = self.data.begin_call().await;
        self.guard().await?;
        self.require_funded_airline(caller).await?;

        let existing = self.data.airline(candidate).await?;
        if existing.as_ref().is_some_and(|a| a.registered) {
            return Err(SuretyError::AlreadyRegistered(candidate.clone()));
        }
        let mut airline = existing.unwrap_or_else(|| Airline::pending(candidate.clone(), name));
        if airline.name.is_empty() {
            airline.name = name.to_string();
        }

        let registered = self.data.registered_airline_count().await?;
        let phase =
            RegistrationPhase::for_registered_count(registered, self.config.bootstrap_airline_limit);

        let outcome = match phase {
            RegistrationPhase::Bootstrap => {
                airline.registered = true;
                RegistrationOutcome::Registered
            }
            RegistrationPhase::Consensus { required_votes } => {
                let votes = airline.record_vote(caller)?;
                if votes >= required_votes {
                    airline.registered = true;
                    RegistrationOutcome::Registered
                } else {
                    RegistrationOutcome::VoteRecorded {
                        votes,
                        required: required_votes,
                    }
                }
            }
        };

        self.data
            .commit(
                &self.identity,
                ChangeSet {
                    airlines: vec![airline],
                    ..ChangeSet::default()
                },
            )
            .await?;

        match outcome {
            RegistrationOutcome::Registered => {
                info!(airline = %candidate, sponsor = %caller, "airline registered")
            }
            RegistrationOutcome::VoteRecorded { votes, required } => {
                info!(airline = %candidate, voter = %caller, votes, required, "registration vote recorded")
            }
        }
        Ok(outcome)
    }

    /// Adds `value` to the caller's funding. Returns whether the caller is
    /// funded after the call.
    pub async fn fund_airline_insurance(&self, value: Decimal, caller: &Identity) -> Result<bool> {
        let _call = self.data.begin_call().await;
        self.guard().await?;
        let amount = Amount::new(value)?;

        let mut airline = self
            .data
            .airline(caller)
            .await?
            .unwrap_or_else(|| Airline::pending(caller.clone(), ""));
        let became_funded = airline.add_funding(amount, self.config.funding_threshold)?;
        let funded = airline.funded;
        let total = airline.funded_amount;

        self.data
            .commit(
                &self.identity,
                ChangeSet {
                    airlines: vec![airline],
                    ..ChangeSet::default()
                },
            )
            .await?;

        info!(airline = %caller, amount = %Balance::from(amount), %total, "airline funding received");
        if became_funded {
            info!(airline = %caller, "airline reached funding threshold");
        }
        Ok(funded)
    }

    pub async fn is_airline_registered(&self, identity: &Identity) -> Result<bool> {
        Ok(self
            .data
            .airline(identity)
            .await?
            .is_some_and(|a| a.registered))
    }

    pub async fn is_airline_funded(&self, identity: &Identity) -> Result<bool> {
        Ok(self.data.airline(identity).await?.is_some_and(|a| a.funded))
    }

    pub async fn registered_airline_count(&self) -> Result<usize> {
        self.data.registered_airline_count().await
    }

    pub async fn airline(&self, identity: &Identity) -> Result<Option<Airline>> {
        self.data.airline(identity).await
    }
}
