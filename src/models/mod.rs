// Type aliases used across models
pub type BrokerId = u32;
pub type TopicName = String;
pub type PartitionId = u32;

/// Reserved broker ID standing in for "any replacement". Never a real node.
pub const STUB_BROKER_ID: BrokerId = 0;

// Module declarations
mod broker;
mod metadata;
mod partition;

// Re-exports
pub use broker::Broker;
pub use metadata::{merge_metrics, BrokerMeta, BrokerMetaMap, BrokerMetrics, BrokerMetricsMap};
pub use partition::{
    BrokerUseStats, Partition, PartitionMap, PartitionMeta, PartitionMetaMap, PartitionSizes,
};
