use super::amount::{Amount, Balance};
use super::identity::Identity;
use crate::error::SuretyError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An airline record, registered or still collecting votes.
///
/// A record is created by the first call that names the identity (a
/// registration, a consensus vote, or a funding deposit) and is never
/// removed. Only a record that is both `registered` and `funded` may act.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Airline {
    pub identity: Identity,
    pub name: String,
    pub registered: bool,
    pub funded: bool,
    pub funded_amount: Balance,
    /// Registered-and-funded airlines that voted for this one.
    pub votes: BTreeSet<Identity>,
}

impl Airline {
    /// A record that exists but is neither registered nor funded.
    pub fn pending(identity: Identity, name: impl Into<String>) -> Self {
        Self {
            identity,
            name: name.into(),
            registered: false,
            funded: false,
            funded_amount: Balance::ZERO,
            votes: BTreeSet::new(),
        }
    }

    /// The first airline, registered when the ledger is created.
    pub fn genesis(identity: Identity, name: impl Into<String>) -> Self {
        Self {
            registered: true,
            ..Self::pending(identity, name)
        }
    }

    pub fn can_act(&self) -> bool {
        self.registered && self.funded
    }

    /// Adds funding; returns `true` only on the call that crosses `threshold`.
    ///
    /// An overflowing total leaves the record untouched.
    pub fn add_funding(&mut self, amount: Amount, threshold: Balance) -> Result<bool, SuretyError> {
        self.funded_amount = self.funded_amount.checked_add(amount.into())?;
        if !self.funded && self.funded_amount >= threshold {
            self.funded = true;
            return Ok(true);
        }
        Ok(false)
    }

    /// Records `voter`'s vote. Each voter counts once.
    pub fn record_vote(&mut self, voter: &Identity) -> Result<usize, SuretyError> {
        if !self.votes.insert(voter.clone()) {
            return Err(SuretyError::DuplicateVote {
                voter: voter.clone(),
                candidate: self.identity.clone(),
            });
        }
        Ok(self.votes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amount(v: rust_decimal::Decimal) -> Amount {
        Amount::new(v).unwrap()
    }

    #[test]
    fn test_funding_flips_once_at_threshold() {
        let threshold = Balance::new(dec!(10));
        let mut airline = Airline::genesis("0xa1".into(), "Genesis Air");

        assert!(!airline.add_funding(amount(dec!(4)), threshold).unwrap());
        assert!(!airline.funded);
        assert!(airline.add_funding(amount(dec!(6)), threshold).unwrap());
        assert!(airline.funded);
        assert!(!airline.add_funding(amount(dec!(1)), threshold).unwrap());
        assert!(airline.funded);
        assert_eq!(airline.funded_amount, Balance::new(dec!(11)));
    }

    #[test]
    fn test_funding_alone_does_not_register() {
        let mut airline = Airline::pending("0xa9".into(), "");
        airline
            .add_funding(amount(dec!(10)), Balance::new(dec!(10)))
            .unwrap();
        assert!(airline.funded);
        assert!(!airline.registered);
        assert!(!airline.can_act());
    }

    #[test]
    fn test_overflowing_funding_is_rejected() {
        let threshold = Balance::new(dec!(10));
        let mut airline = Airline::genesis("0xa1".into(), "Genesis Air");
        airline
            .add_funding(amount(rust_decimal::Decimal::MAX), threshold)
            .unwrap();

        let result = airline.add_funding(amount(dec!(1)), threshold);
        assert!(matches!(result, Err(SuretyError::InvalidAmount(_))));
        assert_eq!(
            airline.funded_amount,
            Balance::new(rust_decimal::Decimal::MAX)
        );
    }

    #[test]
    fn test_duplicate_vote_rejected() {
        let mut airline = Airline::pending("0xa5".into(), "Five");
        let voter = Identity::from("0xa1");
        assert_eq!(airline.record_vote(&voter).unwrap(), 1);
        assert!(matches!(
            airline.record_vote(&voter),
            Err(SuretyError::DuplicateVote { .. })
        ));
        assert_eq!(airline.votes.len(), 1);
    }
}
