//! Flight registration and status reports.

use super::app::SuretyApp;
use crate::domain::flight::{Flight, FlightId, FlightStatus};
use crate::domain::identity::Identity;
use crate::domain::ports::ChangeSet;
use crate::error::{Result, SuretyError};
use tracing::info;

impl SuretyApp {
    /// Registers a flight operated by `caller`, which must be a funded
    /// airline.
    pub async fn register_flight(
        &self,
        name: &str,
        departure_timestamp: u64,
        caller: &Identity,
    ) -> Result<FlightId> {
        let _call = self.data.begin_call().await;
        self.guard().await?;
        self.require_funded_airline(caller).await?;

        let flight = Flight::new(caller.clone(), name, departure_timestamp);
        let id = flight.id;
        if self.data.flight(&id).await?.is_some() {
            return Err(SuretyError::DuplicateFlight(id.to_hex()));
        }

        self.data
            .commit(
                &self.identity,
                ChangeSet {
                    flights: vec![flight],
                    ..ChangeSet::default()
                },
            )
            .await?;

        info!(flight = %id, airline = %caller, name, departure_timestamp, "flight registered");
        Ok(id)
    }

    /// All flight ids, in registration order.
    pub async fn current_flights(&self) -> Result<Vec<FlightId>> {
        self.data.flight_ids().await
    }

    pub async fn flight_information(&self, flight_id: &FlightId) -> Result<Flight> {
        self.data
            .flight(flight_id)
            .await?
            .ok_or_else(|| SuretyError::UnknownFlight(flight_id.to_hex()))
    }

    /// Records the status reported for a flight by the oracle collaborator.
    ///
    /// An airline-caused delay credits every policy on the flight that has
    /// not been paid yet. Returns how many policies were credited.
    pub async fn process_flight_status(
        &self,
        flight_id: &FlightId,
        status_code: u8,
        caller: &Identity,
    ) -> Result<usize> {
        let _call = self.data.begin_call().await;
        self.guard().await?;

        let mut flight = self
            .data
            .flight(flight_id)
            .await?
            .ok_or_else(|| SuretyError::UnknownFlight(flight_id.to_hex()))?;
        let status = FlightStatus::try_from(status_code)?;
        flight.status = status;

        let mut changes = ChangeSet {
            flights: vec![flight],
            ..ChangeSet::default()
        };
        let credited = if status.triggers_payout() {
            self.stage_payouts(flight_id, &mut changes).await?
        } else {
            0
        };

        self.data.commit(&self.identity, changes).await?;

        info!(flight = %flight_id, status = status_code, reporter = %caller, credited, "flight status processed");
        Ok(credited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuretyConfig;
    use crate::infrastructure::in_memory::InMemoryLedgerStore;
    use rust_decimal_macros::dec;

    async fn funded_app() -> SuretyApp {
        let app = SuretyApp::deploy(
            Box::new(InMemoryLedgerStore::new()),
            SuretyConfig {
                owner: "0xowner".into(),
                app_identity: "0xapp".into(),
                genesis_airline: Some("0xa1".into()),
                ..SuretyConfig::default()
            },
        )
        .await
        .unwrap();
        app.fund_airline_insurance(dec!(10), &"0xa1".into())
            .await
            .unwrap();
        app
    }

    #[tokio::test]
    async fn test_register_flights_in_order() {
        let app = funded_app().await;
        let airline = Identity::from("0xa1");
        let first = app.register_flight("ND1309", 1_700_000_000, &airline).await.unwrap();
        let second = app.register_flight("ND1310", 1_700_000_000, &airline).await.unwrap();

        assert_eq!(app.current_flights().await.unwrap(), vec![first, second]);
        let info = app.flight_information(&first).await.unwrap();
        assert_eq!(info.name, "ND1309");
        assert_eq!(info.airline, airline);
        assert_eq!(info.status, FlightStatus::Unknown);
    }

    #[tokio::test]
    async fn test_duplicate_flight_rejected() {
        let app = funded_app().await;
        let airline = Identity::from("0xa1");
        app.register_flight("ND1309", 42, &airline).await.unwrap();
        let result = app.register_flight("ND1309", 42, &airline).await;
        assert!(matches!(result, Err(SuretyError::DuplicateFlight(_))));
        assert_eq!(app.current_flights().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unfunded_airline_cannot_register_flight() {
        let app = funded_app().await;
        let result = app.register_flight("XX1", 42, &"0xa9".into()).await;
        assert!(matches!(result, Err(SuretyError::CallerNotFundedAirline(_))));
    }

    #[tokio::test]
    async fn test_status_of_unknown_flight() {
        let app = funded_app().await;
        let missing = FlightId([9u8; 32]);
        let result = app.process_flight_status(&missing, 20, &"0xoracle".into()).await;
        assert!(matches!(result, Err(SuretyError::UnknownFlight(_))));
        assert!(matches!(
            app.flight_information(&missing).await,
            Err(SuretyError::UnknownFlight(_))
        ));
    }

    #[tokio::test]
    async fn test_inert_status_is_stored() {
        let app = funded_app().await;
        let id = app.register_flight("ND1309", 42, &"0xa1".into()).await.unwrap();
        let credited = app.process_flight_status(&id, 30, &"0xoracle".into()).await.unwrap();
        assert_eq!(credited, 0);
        assert_eq!(
            app.flight_information(&id).await.unwrap().status,
            FlightStatus::LateWeather
        );
    }

    #[tokio::test]
    async fn test_invalid_status_code_leaves_flight_untouched() {
        let app = funded_app().await;
        let id = app.register_flight("ND1309", 42, &"0xa1".into()).await.unwrap();
        let result = app.process_flight_status(&id, 21, &"0xoracle".into()).await;
        assert!(matches!(result, Err(SuretyError::InvalidStatusCode(21))));
        assert_eq!(
            app.flight_information(&id).await.unwrap().status,
            FlightStatus::Unknown
        );
    }
}
