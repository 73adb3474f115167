use super::identity::Identity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Process-wide switches owned by the storage layer.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct LedgerSettings {
    pub owner: Identity,
    pub operational: bool,
    /// Business-logic deployments allowed to commit changes. More than one
    /// entry only while an upgrade is being rolled over.
    pub authorized_callers: BTreeSet<Identity>,
}

impl LedgerSettings {
    pub fn new(owner: Identity) -> Self {
        Self {
            owner,
            operational: true,
            authorized_callers: BTreeSet::new(),
        }
    }

    pub fn is_owner(&self, identity: &Identity) -> bool {
        &self.owner == identity
    }
}
