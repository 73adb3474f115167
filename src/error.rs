use crate::domain::amount::Balance;
use crate::domain::identity::Identity;
use thiserror::Error;

/// Every failure the ledger reports to its caller.
///
/// The first group mirrors the guard and business-rule rejections. A
/// rejected call never leaves partial state behind, so callers may retry
/// with different arguments without any cleanup.
#[derive(Error, Debug)]
pub enum SuretyError {
    #[error("Ledger is paused")]
    ContractPaused,
    #[error("Access denied: {0} is not the ledger owner")]
    AccessDenied(Identity),
    #[error("Caller {0} is not authorized to write to the ledger")]
    NotAuthorized(Identity),
    #[error("Caller {0} is not a registered and funded airline")]
    CallerNotFundedAirline(Identity),
    #[error("Airline {0} is already registered")]
    AlreadyRegistered(Identity),
    #[error("Airline {voter} already voted for {candidate}")]
    DuplicateVote { voter: Identity, candidate: Identity },
    #[error("Flight {0} is already registered")]
    DuplicateFlight(String),
    #[error("Unknown flight {0}")]
    UnknownFlight(String),
    #[error("Passenger {passenger} already holds a policy on flight {flight}")]
    DuplicatePolicy { passenger: Identity, flight: String },
    #[error("Invalid premium: {0}")]
    InvalidPremium(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid flight status code {0}")]
    InvalidStatusCode(u8),
    #[error("Transfer of {amount} to {passenger} failed: {reason}")]
    TransferFailed {
        passenger: Identity,
        amount: Balance,
        reason: String,
    },
    #[error("Invalid call: {0}")]
    InvalidCall(String),
    #[error("Ledger settings have not been initialized")]
    NotInitialized,
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDBError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, SuretyError>;
