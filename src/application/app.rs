use super::data::SuretyData;
use crate::config::SuretyConfig;
use crate::domain::airline::Airline;
use crate::domain::identity::Identity;
use crate::domain::ports::LedgerStoreBox;
use crate::error::{Result, SuretyError};
use std::sync::Arc;

/// The business-logic layer of the ledger.
///
/// `SuretyApp` validates every call against the registration, funding and
/// insurance rules and hands the resulting writes to [`SuretyData`] under
/// its own identity. Several apps can share one `SuretyData`, which is how
/// a new rule set is rolled out while storage stays in place.
///
/// The operations are split by concern across `registrar`, `flights` and
/// `escrow`.
pub struct SuretyApp {
    pub(crate) identity: Identity,
    pub(crate) data: Arc<SuretyData>,
    pub(crate) config: SuretyConfig,
}

impl SuretyApp {
    /// Creates a business-logic layer bound to existing storage.
    ///
    /// The app can only write once the storage owner has authorized
    /// `identity`.
    pub fn new(identity: Identity, data: Arc<SuretyData>, config: SuretyConfig) -> Self {
        Self {
            identity,
            data,
            config,
        }
    }

    /// Opens storage over `store` and deploys an app on it, authorized on
    /// behalf of the configured owner.
    pub async fn deploy(store: LedgerStoreBox, config: SuretyConfig) -> Result<Self> {
        let genesis = config
            .genesis_airline
            .clone()
            .map(|identity| Airline::genesis(identity, config.genesis_airline_name.clone()));
        let data = SuretyData::open(store, config.owner.clone(), genesis).await?;
        let owner = data.owner().await?;
        data.authorize_caller(&config.app_identity, &owner).await?;

        Ok(Self::new(config.app_identity.clone(), Arc::new(data), config))
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn data(&self) -> &Arc<SuretyData> {
        &self.data
    }

    pub fn config(&self) -> &SuretyConfig {
        &self.config
    }

    pub async fn is_operational(&self) -> Result<bool> {
        self.data.is_operational().await
    }

    /// Checks run before any mutating operation: the ledger must be
    /// operational and this app must be an authorized caller.
    pub(crate) async fn guard(&self) -> Result<()> {
        if !self.data.is_operational().await? {
            return Err(SuretyError::ContractPaused);
        }
        if !self.data.is_caller_authorized(&self.identity).await? {
            return Err(SuretyError::NotAuthorized(self.identity.clone()));
        }
        Ok(())
    }

    pub(crate) async fn require_funded_airline(&self, caller: &Identity) -> Result<Airline> {
        match self.data.airline(caller).await? {
            Some(airline) if airline.can_act() => Ok(airline),
            _ => Err(SuretyError::CallerNotFundedAirline(caller.clone())),
        }
    }
}
