//! Replays scripted ledger calls against a deployed app.

use super::csv::call_reader::{CallType, LedgerCall};
use crate::application::app::SuretyApp;
use crate::application::registrar::RegistrationOutcome;
use crate::domain::ports::FundsTransfer;
use crate::error::Result;

/// Executes one call and describes what it did.
///
/// Owner operations (`set_operational`, `authorize_caller`,
/// `deauthorize_caller`) go straight to the storage layer, everything else
/// through the business-logic layer.
pub async fn dispatch(
    app: &SuretyApp,
    transfer: &dyn FundsTransfer,
    call: &LedgerCall,
) -> Result<String> {
    let caller = &call.caller;
    match call.op {
        CallType::SetOperational => {
            let operational = call.flag()?;
            app.data()
                .set_operational_status(operational, caller)
                .await?;
            Ok(format!("operational set to {}", operational))
        }
        CallType::AuthorizeCaller => {
            let target = call.target()?;
            app.data().authorize_caller(target, caller).await?;
            Ok(format!("authorized {}", target))
        }
        CallType::DeauthorizeCaller => {
            let target = call.target()?;
            app.data().deauthorize_caller(target, caller).await?;
            Ok(format!("deauthorized {}", target))
        }
        CallType::RegisterAirline => {
            let target = call.target()?;
            match app.register_airline(target, call.name()?, caller).await? {
                RegistrationOutcome::Registered => Ok(format!("registered airline {}", target)),
                RegistrationOutcome::VoteRecorded { votes, required } => Ok(format!(
                    "vote for {} recorded ({}/{})",
                    target, votes, required
                )),
            }
        }
        CallType::FundAirline => {
            let funded = app.fund_airline_insurance(call.amount()?, caller).await?;
            Ok(format!("funded {} (threshold met: {})", caller, funded))
        }
        CallType::RegisterFlight => {
            let id = app
                .register_flight(call.name()?, call.timestamp()?, caller)
                .await?;
            Ok(format!("registered flight {}", id))
        }
        CallType::RegisterPassenger => {
            let target = call.target()?;
            app.register_passenger(target, &call.flight_id()?, caller)
                .await?;
            Ok(format!("registered passenger {}", target))
        }
        CallType::BuyInsurance => {
            let target = call.target()?;
            let policy = app
                .buy_flight_insurance(target, &call.flight_id()?, call.amount()?, caller)
                .await?;
            Ok(format!(
                "insured {} on {} for {}",
                target,
                policy.flight_id,
                policy.premium.value()
            ))
        }
        CallType::ProcessFlightStatus => {
            let flight_id = call.flight_id()?;
            let credited = app
                .process_flight_status(&flight_id, call.status_code()?, caller)
                .await?;
            Ok(format!(
                "status recorded for {}, {} policies credited",
                flight_id, credited
            ))
        }
        CallType::PayoutFunds => {
            let amount = app.payout_funds(caller, transfer).await?;
            Ok(format!("paid out {} to {}", amount, caller))
        }
    }
}
