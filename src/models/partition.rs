use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use super::{BrokerId, PartitionId, TopicName};
use crate::{PlannerError, Result};

/// A partition assignment in the reassignment document layout:
/// `{"version": 1, "partitions": [{"topic": "t", "partition": 0, "replicas": [1, 2]}]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartitionMap {
    pub version: u32,
    pub partitions: Vec<Partition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub topic: TopicName,
    pub partition: PartitionId,
    /// Ordered replica set. The first entry is the preferred leader.
    pub replicas: Vec<BrokerId>,
}

impl Partition {
    pub fn new(topic: impl Into<TopicName>, partition: PartitionId, replicas: Vec<BrokerId>) -> Self {
        Self {
            topic: topic.into(),
            partition,
            replicas,
        }
    }
}

impl PartitionMap {
    pub fn new(partitions: Vec<Partition>) -> Self {
        Self {
            version: 1,
            partitions,
        }
    }

    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(PlannerError::InvalidPartitionMap)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(PlannerError::InvalidPartitionMap)
    }

    /// Leader and follower counts per broker, ordered by broker ID.
    pub fn use_stats(&self) -> Vec<BrokerUseStats> {
        let mut stats: BTreeMap<BrokerId, BrokerUseStats> = BTreeMap::new();

        for partition in &self.partitions {
            for (position, &id) in partition.replicas.iter().enumerate() {
                let entry = stats.entry(id).or_insert_with(|| BrokerUseStats {
                    id,
                    ..Default::default()
                });
                if position == 0 {
                    entry.leader += 1;
                } else {
                    entry.follower += 1;
                }
            }
        }

        stats.into_values().collect()
    }
}

/// Partition ownership counts for one broker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerUseStats {
    pub id: BrokerId,
    pub leader: usize,
    pub follower: usize,
}

/// Per-partition metadata gathered from the cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartitionMeta {
    /// Partition size in bytes.
    #[serde(rename = "Size")]
    pub size: f64,
}

/// Partition metadata keyed by topic, then partition number.
pub type PartitionMetaMap = HashMap<TopicName, HashMap<PartitionId, PartitionMeta>>;

/// Resolves the on-disk size of a partition.
pub trait PartitionSizes {
    fn size(&self, partition: &Partition) -> Result<f64>;
}

impl PartitionSizes for PartitionMetaMap {
    fn size(&self, partition: &Partition) -> Result<f64> {
        self.get(&partition.topic)
            .and_then(|partitions| partitions.get(&partition.partition))
            .map(|meta| meta.size)
            .ok_or_else(|| PlannerError::PartitionMetaNotFound {
                topic: partition.topic.clone(),
                partition: partition.partition,
            })
    }
}
