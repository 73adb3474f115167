use crate::domain::flight::FlightId;
use crate::domain::identity::Identity;
use crate::error::{Result, SuretyError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    SetOperational,
    AuthorizeCaller,
    DeauthorizeCaller,
    RegisterAirline,
    FundAirline,
    RegisterFlight,
    RegisterPassenger,
    BuyInsurance,
    ProcessFlightStatus,
    PayoutFunds,
}

/// One row of a call script: `op,caller,target,airline,name,timestamp,value`.
///
/// Which columns matter depends on `op`. Flights are referenced by their
/// `(airline, name, timestamp)` triple, or by their hex id in `name` with
/// `airline` left empty. `value` carries the amount, status code or flag.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct LedgerCall {
    pub op: CallType,
    pub caller: Identity,
    pub target: Option<Identity>,
    pub airline: Option<Identity>,
    pub name: Option<String>,
    pub timestamp: Option<u64>,
    pub value: Option<String>,
}

impl LedgerCall {
    pub fn target(&self) -> Result<&Identity> {
        self.target
            .as_ref()
            .ok_or_else(|| self.missing("target"))
    }

    pub fn name(&self) -> Result<&str> {
        self.name.as_deref().ok_or_else(|| self.missing("name"))
    }

    pub fn timestamp(&self) -> Result<u64> {
        self.timestamp.ok_or_else(|| self.missing("timestamp"))
    }

    /// The flight named by the `airline`, `name` and `timestamp` columns.
    pub fn flight_id(&self) -> Result<FlightId> {
        let name = self.name()?;
        match &self.airline {
            Some(airline) => Ok(FlightId::derive(airline, name, self.timestamp()?)),
            None => FlightId::from_hex(name).map_err(|e| {
                SuretyError::InvalidCall(format!("bad flight id '{}': {}", name, e))
            }),
        }
    }

    pub fn amount(&self) -> Result<Decimal> {
        let raw = self.value.as_deref().ok_or_else(|| self.missing("value"))?;
        Decimal::from_str(raw)
            .map_err(|e| SuretyError::InvalidCall(format!("bad amount '{}': {}", raw, e)))
    }

    pub fn status_code(&self) -> Result<u8> {
        let raw = self.value.as_deref().ok_or_else(|| self.missing("value"))?;
        raw.parse()
            .map_err(|e| SuretyError::InvalidCall(format!("bad status code '{}': {}", raw, e)))
    }

    pub fn flag(&self) -> Result<bool> {
        let raw = self.value.as_deref().ok_or_else(|| self.missing("value"))?;
        raw.parse()
            .map_err(|e| SuretyError::InvalidCall(format!("bad flag '{}': {}", raw, e)))
    }

    fn missing(&self, column: &str) -> SuretyError {
        SuretyError::InvalidCall(format!("{:?} requires the '{}' column", self.op, column))
    }
}

/// Reads ledger calls from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<LedgerCall>`. It trims whitespace and tolerates ragged rows.
pub struct CallReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CallReader<R> {
    /// Creates a new `CallReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes calls.
    pub fn calls(self) -> impl Iterator<Item = Result<LedgerCall>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(SuretyError::from))
    }
}
