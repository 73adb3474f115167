use super::identity::Identity;
use crate::error::SuretyError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Deterministic key of a flight: `sha256(airline, name, departure)`.
///
/// Registering the same triple twice yields the same id, which is how
/// duplicate registrations are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlightId(pub [u8; 32]);

impl FlightId {
    pub fn derive(airline: &Identity, name: &str, departure_timestamp: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(airline.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(departure_timestamp.to_be_bytes());
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Status codes reported by the oracle collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FlightStatus {
    #[default]
    Unknown,
    OnTime,
    LateAirline,
    LateWeather,
    LateTechnical,
    LateOther,
}

impl FlightStatus {
    pub fn code(self) -> u8 {
        match self {
            FlightStatus::Unknown => 0,
            FlightStatus::OnTime => 10,
            FlightStatus::LateAirline => 20,
            FlightStatus::LateWeather => 30,
            FlightStatus::LateTechnical => 40,
            FlightStatus::LateOther => 50,
        }
    }

    /// Only an airline-caused delay pays out.
    pub fn triggers_payout(self) -> bool {
        self == FlightStatus::LateAirline
    }
}

impl TryFrom<u8> for FlightStatus {
    type Error = SuretyError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(FlightStatus::Unknown),
            10 => Ok(FlightStatus::OnTime),
            20 => Ok(FlightStatus::LateAirline),
            30 => Ok(FlightStatus::LateWeather),
            40 => Ok(FlightStatus::LateTechnical),
            50 => Ok(FlightStatus::LateOther),
            other => Err(SuretyError::InvalidStatusCode(other)),
        }
    }
}

impl From<FlightStatus> for u8 {
    fn from(status: FlightStatus) -> Self {
        status.code()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Flight {
    pub id: FlightId,
    pub airline: Identity,
    pub name: String,
    pub departure_timestamp: u64,
    pub status: FlightStatus,
    pub registered: bool,
}

impl Flight {
    pub fn new(airline: Identity, name: impl Into<String>, departure_timestamp: u64) -> Self {
        let name = name.into();
        Self {
            id: FlightId::derive(&airline, &name, departure_timestamp),
            airline,
            name,
            departure_timestamp,
            status: FlightStatus::Unknown,
            registered: true,
        }
    }
}
