#![allow(dead_code)]

use flightsurety::application::app::SuretyApp;
use flightsurety::config::SuretyConfig;
use flightsurety::domain::identity::Identity;
use flightsurety::infrastructure::in_memory::InMemoryLedgerStore;
use rust_decimal_macros::dec;
use std::io::Error;
use std::path::Path;

pub const OWNER: &str = "0xowner";
pub const APP: &str = "0xapp";
pub const GENESIS: &str = "0xa1";

pub fn config() -> SuretyConfig {
    SuretyConfig {
        owner: OWNER.into(),
        app_identity: APP.into(),
        genesis_airline: Some(GENESIS.into()),
        ..SuretyConfig::default()
    }
}

/// A deployed app over fresh in-memory storage with a funded genesis airline.
pub async fn funded_app() -> SuretyApp {
    let app = SuretyApp::deploy(Box::new(InMemoryLedgerStore::new()), config())
        .await
        .unwrap();
    app.fund_airline_insurance(dec!(10), &GENESIS.into())
        .await
        .unwrap();
    app
}

pub fn id(value: &str) -> Identity {
    Identity::from(value)
}

/// Writes a call script with the standard header followed by `rows`.
pub fn write_script(path: &Path, rows: &[[&str; 7]]) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    wtr.write_record(["op", "caller", "target", "airline", "name", "timestamp", "value"])?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}
