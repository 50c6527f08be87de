// Kafka Broker Planner Library
// Broker state reconciliation and selection ordering for partition placement

pub mod models;
pub mod broker_map;
pub mod broker_list;
pub mod status;
pub mod config;
pub mod planner;

pub use models::{
    Broker, BrokerId, BrokerMeta, BrokerMetaMap, Partition, PartitionMap, PartitionMetaMap,
    PartitionSizes, STUB_BROKER_ID,
};
pub use broker_map::BrokerMap;
pub use broker_list::BrokerList;
pub use status::{BrokerStatus, UpdateOutcome};
pub use config::{PlannerConfig, SelectionOrder};
pub use planner::{Planner, PlannerBuilder};

pub type Result<T> = std::result::Result<T, PlannerError>;

#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("Broker {0} not found in broker map")]
    BrokerNotFound(BrokerId),

    #[error("Partition {topic}:{partition} not found in partition metadata")]
    PartitionMetaNotFound {
        topic: String,
        partition: models::PartitionId,
    },

    #[error("Invalid partition map: {0}")]
    InvalidPartitionMap(#[source] serde_json::Error),

    #[error("Invalid broker metadata: {0}")]
    InvalidBrokerMeta(#[source] serde_json::Error),
}
