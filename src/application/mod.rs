//! Application layer: the storage layer (`SuretyData`) and the business
//! logic layer (`SuretyApp`) that validates calls before committing them.
//!
//! Every mutating `SuretyApp` operation takes the storage call lock, runs
//! the operational and authorization guard, stages its writes in a
//! `ChangeSet`, and commits once. A failed check returns before the commit.

pub mod app;
pub mod data;
pub mod escrow;
pub mod flights;
pub mod registrar;
