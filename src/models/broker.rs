use serde::{Deserialize, Serialize};
use super::{BrokerId, BrokerMeta, STUB_BROKER_ID};

/// A broker as seen by the planner: load, capacity, locality and the
/// reconciliation flags set by `BrokerMap::update`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Broker {
    pub id: BrokerId,
    /// Rack or zone. Empty when unknown.
    pub locality: String,
    /// Replica slots currently attributed to this broker.
    pub used: usize,
    /// Free storage in bytes.
    pub storage_free: f64,
    /// Excluded from placement; existing replicas must move off.
    pub replace: bool,
    /// Referenced by the prior assignment but absent from registry metadata.
    pub missing: bool,
    /// Introduced in this planning round.
    pub new: bool,
}

impl Broker {
    pub fn new(id: BrokerId) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// The placeholder broker every map carries under ID 0.
    pub fn stub() -> Self {
        Self {
            id: STUB_BROKER_ID,
            replace: true,
            ..Default::default()
        }
    }

    pub fn is_stub(&self) -> bool {
        self.id == STUB_BROKER_ID
    }

    /// Copy rack and storage figures from registry metadata.
    pub fn apply_meta(&mut self, meta: &BrokerMeta) {
        self.locality = meta.rack.clone();
        self.storage_free = meta.storage_free;
    }

    /// Whether this broker may receive new replicas.
    pub fn is_placeable(&self) -> bool {
        !self.is_stub() && !self.replace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_is_marked_for_replacement() {
        let stub = Broker::stub();
        assert!(stub.is_stub());
        assert!(stub.replace);
        assert!(!stub.is_placeable());
    }

    #[test]
    fn test_apply_meta() {
        let mut broker = Broker::new(7);
        let meta = BrokerMeta {
            rack: "us-east-1a".to_string(),
            storage_free: 2048.0,
            ..Default::default()
        };

        broker.apply_meta(&meta);

        assert_eq!(broker.locality, "us-east-1a");
        assert_eq!(broker.storage_free, 2048.0);
        assert_eq!(broker.used, 0);
        assert!(broker.is_placeable());
    }
}
