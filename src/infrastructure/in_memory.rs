use crate::domain::airline::Airline;
use crate::domain::flight::{Flight, FlightId};
use crate::domain::identity::Identity;
use crate::domain::policy::{InsurancePolicy, PassengerAccount};
use crate::domain::ports::{ChangeSet, LedgerStore};
use crate::domain::settings::LedgerSettings;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct LedgerTables {
    settings: Option<LedgerSettings>,
    airlines: BTreeMap<Identity, Airline>,
    flights: HashMap<FlightId, Flight>,
    flight_order: Vec<FlightId>,
    /// Keyed flight-first so a flight's policies are one contiguous range.
    policies: BTreeMap<(FlightId, Identity), InsurancePolicy>,
    passengers: BTreeMap<Identity, PassengerAccount>,
}

/// A thread-safe in-memory ledger store.
///
/// All tables sit behind one `RwLock`, so a commit is applied under a single
/// write guard and readers never observe half of a call's changes. Clones
/// share the same tables.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    tables: Arc<RwLock<LedgerTables>>,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory ledger store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn settings(&self) -> Result<Option<LedgerSettings>> {
        Ok(self.tables.read().await.settings.clone())
    }

    async fn airline(&self, identity: &Identity) -> Result<Option<Airline>> {
        Ok(self.tables.read().await.airlines.get(identity).cloned())
    }

    async fn airlines(&self) -> Result<Vec<Airline>> {
        Ok(self.tables.read().await.airlines.values().cloned().collect())
    }

    async fn registered_airline_count(&self) -> Result<usize> {
        let tables = self.tables.read().await;
        Ok(tables.airlines.values().filter(|a| a.registered).count())
    }

    async fn flight(&self, id: &FlightId) -> Result<Option<Flight>> {
        Ok(self.tables.read().await.flights.get(id).cloned())
    }

    async fn flight_ids(&self) -> Result<Vec<FlightId>> {
        Ok(self.tables.read().await.flight_order.clone())
    }

    async fn policy(
        &self,
        passenger: &Identity,
        flight_id: &FlightId,
    ) -> Result<Option<InsurancePolicy>> {
        let tables = self.tables.read().await;
        Ok(tables
            .policies
            .get(&(*flight_id, passenger.clone()))
            .cloned())
    }

    async fn policies_for_flight(&self, flight_id: &FlightId) -> Result<Vec<InsurancePolicy>> {
        let tables = self.tables.read().await;
        Ok(tables
            .policies
            .range((*flight_id, Identity::new(""))..)
            .take_while(|((id, _), _)| id == flight_id)
            .map(|(_, policy)| policy.clone())
            .collect())
    }

    async fn passenger(&self, identity: &Identity) -> Result<Option<PassengerAccount>> {
        Ok(self.tables.read().await.passengers.get(identity).cloned())
    }

    async fn passengers(&self) -> Result<Vec<PassengerAccount>> {
        Ok(self.tables.read().await.passengers.values().cloned().collect())
    }

    async fn commit(&self, changes: ChangeSet) -> Result<()> {
        let mut tables = self.tables.write().await;
        if let Some(settings) = changes.settings {
            tables.settings = Some(settings);
        }
        for airline in changes.airlines {
            tables.airlines.insert(airline.identity.clone(), airline);
        }
        for flight in changes.flights {
            if tables.flights.insert(flight.id, flight.clone()).is_none() {
                tables.flight_order.push(flight.id);
            }
        }
        for policy in changes.policies {
            tables
                .policies
                .insert((policy.flight_id, policy.passenger.clone()), policy);
        }
        for passenger in changes.passengers {
            tables.passengers.insert(passenger.identity.clone(), passenger);
        }
        Ok(())
    }
}
