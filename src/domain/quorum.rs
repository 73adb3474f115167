//! Vote-threshold arithmetic for airline registration.

/// `ceil(n / 2)` without going through floating point.
pub fn ceil_half(n: usize) -> usize {
    n / 2 + n % 2
}

/// How a registration request is decided, given the number of airlines
/// registered when the call starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationPhase {
    /// Fewer airlines than the bootstrap limit: any funded airline may
    /// register a newcomer on its own.
    Bootstrap,
    /// Registration requires this many distinct votes.
    Consensus { required_votes: usize },
}

impl RegistrationPhase {
    pub fn for_registered_count(registered: usize, bootstrap_limit: usize) -> Self {
        if registered < bootstrap_limit {
            Self::Bootstrap
        } else {
            Self::Consensus {
                required_votes: ceil_half(registered),
            }
        }
    }
}
