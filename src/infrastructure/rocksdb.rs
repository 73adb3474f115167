use crate::domain::airline::Airline;
use crate::domain::flight::{Flight, FlightId};
use crate::domain::identity::Identity;
use crate::domain::policy::{InsurancePolicy, PassengerAccount};
use crate::domain::ports::{ChangeSet, LedgerStore};
use crate::domain::settings::LedgerSettings;
use crate::error::{Result, SuretyError};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options, WriteBatch};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for the settings record and store metadata.
pub const CF_SETTINGS: &str = "settings";
/// Column Family for airline records, keyed by identity.
pub const CF_AIRLINES: &str = "airlines";
/// Column Family for flights, keyed by flight id.
pub const CF_FLIGHTS: &str = "flights";
/// Column Family mapping a big-endian sequence number to a flight id.
pub const CF_FLIGHT_ORDER: &str = "flight_order";
/// Column Family for policies, keyed by flight id followed by passenger.
pub const CF_POLICIES: &str = "policies";
/// Column Family for passenger accounts, keyed by identity.
pub const CF_PASSENGERS: &str = "passengers";

const SETTINGS_KEY: &[u8] = b"settings";
const FLIGHT_COUNT_KEY: &[u8] = b"flight_count";

/// A persistent ledger store using RocksDB.
///
/// Each entity kind lives in its own Column Family, values are JSON. A
/// `ChangeSet` is written as a single `WriteBatch`, which RocksDB applies
/// atomically.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    commit_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path, creating
    /// any missing column families.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [
            CF_SETTINGS,
            CF_AIRLINES,
            CF_FLIGHTS,
            CF_FLIGHT_ORDER,
            CF_POLICIES,
            CF_PASSENGERS,
        ]
        .into_iter()
        .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
        .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            commit_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            SuretyError::InternalError(Box::new(std::io::Error::other(format!(
                "{} column family not found",
                name
            ))))
        })
    }

    fn get_json<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan_json<T: DeserializeOwned>(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(prefix, Direction::Forward));

        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            values.push(serde_json::from_slice(&value)?);
        }

        Ok(values)
    }

    fn flight_count(&self) -> Result<u64> {
        let cf = self.cf(CF_SETTINGS)?;
        match self.db.get_cf(cf, FLIGHT_COUNT_KEY)? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    SuretyError::InternalError(Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "Corrupt flight counter",
                    )))
                })?;
                Ok(u64::from_be_bytes(raw))
            }
            None => Ok(0),
        }
    }
}

fn policy_key(flight_id: &FlightId, passenger: &Identity) -> Vec<u8> {
    let mut key = flight_id.as_bytes().to_vec();
    key.extend_from_slice(passenger.as_str().as_bytes());
    key
}

#[async_trait]
impl LedgerStore for RocksDBStore {
    async fn settings(&self) -> Result<Option<LedgerSettings>> {
        self.get_json(CF_SETTINGS, SETTINGS_KEY)
    }

    async fn airline(&self, identity: &Identity) -> Result<Option<Airline>> {
        self.get_json(CF_AIRLINES, identity.as_str().as_bytes())
    }

    async fn airlines(&self) -> Result<Vec<Airline>> {
        self.scan_json(CF_AIRLINES, &[])
    }

    async fn registered_airline_count(&self) -> Result<usize> {
        let airlines: Vec<Airline> = self.scan_json(CF_AIRLINES, &[])?;
        Ok(airlines.iter().filter(|a| a.registered).count())
    }

    async fn flight(&self, id: &FlightId) -> Result<Option<Flight>> {
        self.get_json(CF_FLIGHTS, id.as_bytes())
    }

    async fn flight_ids(&self) -> Result<Vec<FlightId>> {
        // Big-endian sequence keys iterate in registration order.
        self.scan_json(CF_FLIGHT_ORDER, &[])
    }

    async fn policy(
        &self,
        passenger: &Identity,
        flight_id: &FlightId,
    ) -> Result<Option<InsurancePolicy>> {
        self.get_json(CF_POLICIES, &policy_key(flight_id, passenger))
    }

    async fn policies_for_flight(&self, flight_id: &FlightId) -> Result<Vec<InsurancePolicy>> {
        self.scan_json(CF_POLICIES, flight_id.as_bytes())
    }

    async fn passenger(&self, identity: &Identity) -> Result<Option<PassengerAccount>> {
        self.get_json(CF_PASSENGERS, identity.as_str().as_bytes())
    }

    async fn passengers(&self) -> Result<Vec<PassengerAccount>> {
        self.scan_json(CF_PASSENGERS, &[])
    }

    async fn commit(&self, changes: ChangeSet) -> Result<()> {
        let _guard = self.commit_lock.lock().await;
        let mut batch = WriteBatch::default();

        if let Some(settings) = &changes.settings {
            batch.put_cf(self.cf(CF_SETTINGS)?, SETTINGS_KEY, serde_json::to_vec(settings)?);
        }

        let cf_airlines = self.cf(CF_AIRLINES)?;
        for airline in &changes.airlines {
            batch.put_cf(
                cf_airlines,
                airline.identity.as_str().as_bytes(),
                serde_json::to_vec(airline)?,
            );
        }

        let cf_flights = self.cf(CF_FLIGHTS)?;
        let cf_order = self.cf(CF_FLIGHT_ORDER)?;
        let mut next_seq = self.flight_count()?;
        let mut appended = HashSet::new();
        for flight in &changes.flights {
            let is_new = self.db.get_pinned_cf(cf_flights, flight.id.as_bytes())?.is_none();
            if is_new && appended.insert(flight.id) {
                batch.put_cf(cf_order, next_seq.to_be_bytes(), serde_json::to_vec(&flight.id)?);
                next_seq += 1;
            }
            batch.put_cf(cf_flights, flight.id.as_bytes(), serde_json::to_vec(flight)?);
        }
        if !appended.is_empty() {
            batch.put_cf(self.cf(CF_SETTINGS)?, FLIGHT_COUNT_KEY, next_seq.to_be_bytes());
        }

        let cf_policies = self.cf(CF_POLICIES)?;
        for policy in &changes.policies {
            batch.put_cf(
                cf_policies,
                policy_key(&policy.flight_id, &policy.passenger),
                serde_json::to_vec(policy)?,
            );
        }

        let cf_passengers = self.cf(CF_PASSENGERS)?;
        for passenger in &changes.passengers {
            batch.put_cf(
                cf_passengers,
                passenger.identity.as_str().as_bytes(),
                serde_json::to_vec(passenger)?,
            );
        }

        self.db.write(batch)?;
        Ok(())
    }
}
