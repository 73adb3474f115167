use crate::domain::airline::Airline;
use crate::domain::flight::Flight;
use crate::domain::policy::PassengerAccount;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct AirlineRow<'a> {
    airline: &'a str,
    name: &'a str,
    registered: bool,
    funded: bool,
    funded_amount: String,
    votes: usize,
}

#[derive(Serialize)]
struct FlightRow<'a> {
    flight: String,
    airline: &'a str,
    name: &'a str,
    departure: u64,
    status: u8,
}

#[derive(Serialize)]
struct PassengerRow<'a> {
    passenger: &'a str,
    withdrawable: String,
    paid: bool,
}

/// Writes the final ledger state as CSV sections separated by blank lines.
pub struct LedgerWriter<W: Write> {
    inner: W,
}

impl<W: Write> LedgerWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write_airlines(&mut self, airlines: &[Airline]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(&mut self.inner);
        for airline in airlines {
            writer.serialize(AirlineRow {
                airline: airline.identity.as_str(),
                name: &airline.name,
                registered: airline.registered,
                funded: airline.funded,
                funded_amount: airline.funded_amount.to_string(),
                votes: airline.votes.len(),
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_flights(&mut self, flights: &[Flight]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(&mut self.inner);
        for flight in flights {
            writer.serialize(FlightRow {
                flight: flight.id.to_hex(),
                airline: flight.airline.as_str(),
                name: &flight.name,
                departure: flight.departure_timestamp,
                status: flight.status.code(),
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_passengers(&mut self, passengers: &[PassengerAccount]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(&mut self.inner);
        for passenger in passengers {
            writer.serialize(PassengerRow {
                passenger: passenger.identity.as_str(),
                withdrawable: passenger.withdrawable.to_string(),
                paid: passenger.ever_paid,
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes all three sections: airlines, flights, then passengers.
    pub fn write_ledger(
        &mut self,
        airlines: &[Airline],
        flights: &[Flight],
        passengers: &[PassengerAccount],
    ) -> Result<()> {
        self.write_airlines(airlines)?;
        writeln!(self.inner)?;
        self.write_flights(flights)?;
        writeln!(self.inner)?;
        self.write_passengers(passengers)?;
        Ok(())
    }
}
