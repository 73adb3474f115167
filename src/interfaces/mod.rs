//! Inbound and outbound adapters for running the ledger from the CLI.

pub mod csv;
pub mod replay;
