use super::airline::Airline;
use super::amount::Balance;
use super::flight::{Flight, FlightId};
use super::identity::Identity;
use super::policy::{InsurancePolicy, PassengerAccount};
use super::settings::LedgerSettings;
use crate::error::Result;
use async_trait::async_trait;

/// The writes produced by one ledger call.
///
/// A call stages everything here and hands it to [`LedgerStore::commit`]
/// once all of its checks have passed, so a rejected call writes nothing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChangeSet {
    pub settings: Option<LedgerSettings>,
    pub airlines: Vec<Airline>,
    /// Flights not yet in the store are appended to the registration order.
    pub flights: Vec<Flight>,
    pub policies: Vec<InsurancePolicy>,
    pub passengers: Vec<PassengerAccount>,
}

impl ChangeSet {
    pub fn with_settings(settings: LedgerSettings) -> Self {
        Self {
            settings: Some(settings),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_none()
            && self.airlines.is_empty()
            && self.flights.is_empty()
            && self.policies.is_empty()
            && self.passengers.is_empty()
    }
}

/// Persistence port for every ledger entity.
///
/// Implementations must apply a [`ChangeSet`] atomically: either all of it
/// becomes visible or none of it does.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn settings(&self) -> Result<Option<LedgerSettings>>;
    async fn airline(&self, identity: &Identity) -> Result<Option<Airline>>;
    async fn airlines(&self) -> Result<Vec<Airline>>;
    async fn registered_airline_count(&self) -> Result<usize>;
    async fn flight(&self, id: &FlightId) -> Result<Option<Flight>>;
    /// Flight ids in registration order.
    async fn flight_ids(&self) -> Result<Vec<FlightId>>;
    async fn policy(
        &self,
        passenger: &Identity,
        flight_id: &FlightId,
    ) -> Result<Option<InsurancePolicy>>;
    async fn policies_for_flight(&self, flight_id: &FlightId) -> Result<Vec<InsurancePolicy>>;
    async fn passenger(&self, identity: &Identity) -> Result<Option<PassengerAccount>>;
    async fn passengers(&self) -> Result<Vec<PassengerAccount>>;
    async fn commit(&self, changes: ChangeSet) -> Result<()>;
}

/// The external value transfer performed at the end of a withdrawal.
#[async_trait]
pub trait FundsTransfer: Send + Sync {
    async fn transfer(&self, to: &Identity, amount: Balance) -> Result<()>;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;
pub type LedgerStoreFactory = Box<dyn Fn() -> LedgerStoreBox + Send + Sync>;
