use crate::domain::airline::Airline;
use crate::domain::flight::{Flight, FlightId};
use crate::domain::identity::Identity;
use crate::domain::policy::{InsurancePolicy, PassengerAccount};
use crate::domain::ports::{ChangeSet, LedgerStoreBox};
use crate::domain::settings::LedgerSettings;
use crate::error::{Result, SuretyError};
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

/// The storage layer of the ledger.
///
/// `SuretyData` owns the store and the settings record. It holds no business
/// rules: owners toggle the operational flag and the caller allow-list,
/// authorized business-logic deployments commit change sets, and anyone may
/// read.
pub struct SuretyData {
    store: LedgerStoreBox,
    calls: Mutex<()>,
}

impl SuretyData {
    /// Opens the storage layer over `store`.
    ///
    /// A fresh store is initialized with `owner`, the operational flag set,
    /// and the optional genesis airline registered (but not funded). A
    /// store that already holds settings keeps them untouched.
    pub async fn open(
        store: LedgerStoreBox,
        owner: Identity,
        genesis: Option<Airline>,
    ) -> Result<Self> {
        if store.settings().await?.is_none() {
            let mut changes = ChangeSet::with_settings(LedgerSettings::new(owner.clone()));
            if let Some(airline) = genesis {
                info!(airline = %airline.identity, "registering genesis airline");
                changes.airlines.push(airline);
            }
            store.commit(changes).await?;
            info!(%owner, "initialized ledger");
        }

        Ok(Self {
            store,
            calls: Mutex::new(()),
        })
    }

    /// Serializes ledger calls: one call finishes before the next starts.
    pub async fn begin_call(&self) -> MutexGuard<'_, ()> {
        self.calls.lock().await
    }

    pub async fn settings(&self) -> Result<LedgerSettings> {
        self.store.settings().await?.ok_or(SuretyError::NotInitialized)
    }

    pub async fn is_operational(&self) -> Result<bool> {
        Ok(self.settings().await?.operational)
    }

    pub async fn owner(&self) -> Result<Identity> {
        Ok(self.settings().await?.owner)
    }

    pub async fn set_operational_status(&self, operational: bool, caller: &Identity) -> Result<()> {
        let _call = self.begin_call().await;
        let mut settings = self.owner_settings(caller).await?;
        settings.operational = operational;
        self.store.commit(ChangeSet::with_settings(settings)).await?;
        info!(operational, "operational status changed");
        Ok(())
    }

    pub async fn authorize_caller(&self, identity: &Identity, requester: &Identity) -> Result<()> {
        let _call = self.begin_call().await;
        let mut settings = self.owner_settings(requester).await?;
        if settings.authorized_callers.insert(identity.clone()) {
            self.store.commit(ChangeSet::with_settings(settings)).await?;
            info!(caller = %identity, "caller authorized");
        }
        Ok(())
    }

    pub async fn deauthorize_caller(&self, identity: &Identity, requester: &Identity) -> Result<()> {
        let _call = self.begin_call().await;
        let mut settings = self.owner_settings(requester).await?;
        if settings.authorized_callers.remove(identity) {
            self.store.commit(ChangeSet::with_settings(settings)).await?;
            info!(caller = %identity, "caller deauthorized");
        }
        Ok(())
    }

    pub async fn is_caller_authorized(&self, identity: &Identity) -> Result<bool> {
        Ok(self.settings().await?.authorized_callers.contains(identity))
    }

    /// Applies a business-logic call's writes, if `caller` is authorized.
    ///
    /// Callers must already hold the guard from [`SuretyData::begin_call`].
    pub async fn commit(&self, caller: &Identity, changes: ChangeSet) -> Result<()> {
        if !self.is_caller_authorized(caller).await? {
            return Err(SuretyError::NotAuthorized(caller.clone()));
        }
        if changes.settings.is_some() {
            return Err(SuretyError::AccessDenied(caller.clone()));
        }
        if changes.is_empty() {
            return Ok(());
        }
        self.store.commit(changes).await
    }

    async fn owner_settings(&self, requester: &Identity) -> Result<LedgerSettings> {
        let settings = self.settings().await?;
        if !settings.is_owner(requester) {
            return Err(SuretyError::AccessDenied(requester.clone()));
        }
        Ok(settings)
    }

    pub async fn airline(&self, identity: &Identity) -> Result<Option<Airline>> {
        self.store.airline(identity).await
    }

    pub async fn airlines(&self) -> Result<Vec<Airline>> {
        self.store.airlines().await
    }

    pub async fn registered_airline_count(&self) -> Result<usize> {
        self.store.registered_airline_count().await
    }

    pub async fn flight(&self, id: &FlightId) -> Result<Option<Flight>> {
        self.store.flight(id).await
    }

    pub async fn flight_ids(&self) -> Result<Vec<FlightId>> {
        self.store.flight_ids().await
    }

    pub async fn policy(
        &self,
        passenger: &Identity,
        flight_id: &FlightId,
    ) -> Result<Option<InsurancePolicy>> {
        self.store.policy(passenger, flight_id).await
    }

    pub async fn policies_for_flight(&self, flight_id: &FlightId) -> Result<Vec<InsurancePolicy>> {
        self.store.policies_for_flight(flight_id).await
    }

    pub async fn passenger(&self, identity: &Identity) -> Result<Option<PassengerAccount>> {
        self.store.passenger(identity).await
    }

    pub async fn passengers(&self) -> Result<Vec<PassengerAccount>> {
        self.store.passengers().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::InMemoryLedgerStore;

    async fn open() -> SuretyData {
        SuretyData::open(
            Box::new(InMemoryLedgerStore::new()),
            "0xowner".into(),
            Some(Airline::genesis("0xa1".into(), "Genesis Air")),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_initial_state() {
        let data = open().await;
        assert!(data.is_operational().await.unwrap());
        assert_eq!(data.owner().await.unwrap(), Identity::from("0xowner"));
        assert_eq!(data.registered_airline_count().await.unwrap(), 1);
        let genesis = data.airline(&"0xa1".into()).await.unwrap().unwrap();
        assert!(genesis.registered);
        assert!(!genesis.funded);
    }

    #[tokio::test]
    async fn test_reopen_keeps_existing_settings() {
        let store = InMemoryLedgerStore::new();
        let data = SuretyData::open(Box::new(store.clone()), "0xowner".into(), None)
            .await
            .unwrap();
        data.set_operational_status(false, &"0xowner".into())
            .await
            .unwrap();

        let reopened = SuretyData::open(Box::new(store), "0xsomeone".into(), None)
            .await
            .unwrap();
        assert!(!reopened.is_operational().await.unwrap());
        assert_eq!(reopened.owner().await.unwrap(), Identity::from("0xowner"));
    }

    #[tokio::test]
    async fn test_only_owner_toggles_status() {
        let data = open().await;
        let result = data.set_operational_status(false, &"0xa1".into()).await;
        assert!(matches!(result, Err(SuretyError::AccessDenied(_))));
        assert!(data.is_operational().await.unwrap());

        data.set_operational_status(false, &"0xowner".into())
            .await
            .unwrap();
        assert!(!data.is_operational().await.unwrap());
    }

    #[tokio::test]
    async fn test_authorize_and_deauthorize() {
        let data = open().await;
        let app = Identity::from("0xapp");

        assert!(matches!(
            data.authorize_caller(&app, &app).await,
            Err(SuretyError::AccessDenied(_))
        ));

        data.authorize_caller(&app, &"0xowner".into()).await.unwrap();
        assert!(data.is_caller_authorized(&app).await.unwrap());

        data.deauthorize_caller(&app, &"0xowner".into())
            .await
            .unwrap();
        assert!(!data.is_caller_authorized(&app).await.unwrap());
    }

    #[tokio::test]
    async fn test_commit_requires_authorization() {
        let data = open().await;
        let app = Identity::from("0xapp");
        let changes = ChangeSet {
            passengers: vec![PassengerAccount::new("0xp1".into())],
            ..ChangeSet::default()
        };

        assert!(matches!(
            data.commit(&app, changes.clone()).await,
            Err(SuretyError::NotAuthorized(_))
        ));
        assert!(data.passenger(&"0xp1".into()).await.unwrap().is_none());

        data.authorize_caller(&app, &"0xowner".into()).await.unwrap();
        data.commit(&app, changes).await.unwrap();
        assert!(data.passenger(&"0xp1".into()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_commit_cannot_touch_settings() {
        let data = open().await;
        let app = Identity::from("0xapp");
        data.authorize_caller(&app, &"0xowner".into()).await.unwrap();

        let mut settings = data.settings().await.unwrap();
        settings.owner = app.clone();
        let result = data.commit(&app, ChangeSet::with_settings(settings)).await;
        assert!(matches!(result, Err(SuretyError::AccessDenied(_))));
        assert_eq!(data.owner().await.unwrap(), Identity::from("0xowner"));
    }
}
