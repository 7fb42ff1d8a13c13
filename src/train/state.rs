use crate::network::network::Network;

/// The trainer's private network together with where it came from.
///
/// Never mutated in place: each update produces a new state via `advance`,
/// and each restart via `restart`.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkState {
    pub network: Network,
    /// 1-based training attempt that owns these parameters.
    pub attempt: usize,
    /// Updates applied since the attempt started.
    pub version: u64,
}

impl NetworkState {
    pub fn initial(network: Network) -> NetworkState {
        NetworkState { network, attempt: 1, version: 0 }
    }

    pub fn advance(&self, network: Network) -> NetworkState {
        NetworkState {
            network,
            attempt: self.attempt,
            version: self.version + 1,
        }
    }

    pub fn restart(&self, network: Network) -> NetworkState {
        NetworkState {
            network,
            attempt: self.attempt + 1,
            version: 0,
        }
    }
}
