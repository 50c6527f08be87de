use serde::{Deserialize, Serialize};

/// Change counts from one reconciliation of a broker map against a target
/// broker list and registry metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerStatus {
    /// Brokers added to the map.
    pub new: usize,
    /// Target brokers not found in registry metadata.
    pub missing: usize,
    /// Previously retired brokers that have since left the registry.
    pub old_missing: usize,
    /// Brokers marked for removal.
    pub replace: usize,
}

impl BrokerStatus {
    /// Whether any broker changed.
    pub fn changes(&self) -> bool {
        self.new != 0 || self.missing != 0 || self.old_missing != 0 || self.replace != 0
    }
}

impl std::fmt::Display for BrokerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "New: {}, Missing: {}, Old Missing: {}, Replace: {}",
            self.new, self.missing, self.old_missing, self.replace
        )
    }
}

/// Result of `BrokerMap::update`: counters plus one audit line per mutation,
/// in the order the mutations were made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub status: BrokerStatus,
    pub messages: Vec<String>,
}
