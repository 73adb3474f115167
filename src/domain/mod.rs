//! Ledger entities and the ports the application layer talks through.

pub mod airline;
pub mod amount;
pub mod flight;
pub mod identity;
pub mod policy;
pub mod ports;
pub mod quorum;
pub mod settings;
