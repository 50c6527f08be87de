use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use super::BrokerId;
use crate::{PlannerError, Result};

/// Registry metadata for one broker.
///
/// Field names follow the broker registration document the registry stores
/// under `/brokers/ids/<id>`. `storage_free` and `metrics_incomplete` are not
/// part of that document; they are filled in from broker metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerMeta {
    /// Free storage in bytes.
    pub storage_free: f64,
    pub metrics_incomplete: bool,
    pub listener_security_protocol_map: HashMap<String, String>,
    pub endpoints: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub rack: String,
    pub jmx_port: i32,
    pub host: String,
    /// Registration time, milliseconds since the epoch.
    pub timestamp: String,
    pub port: i32,
    pub version: i32,
}

impl BrokerMeta {
    /// Parse a broker registration document.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(PlannerError::InvalidBrokerMeta)
    }

    /// When the broker registered with the registry, if the timestamp parses.
    pub fn registered_at(&self) -> Option<DateTime<Utc>> {
        let millis = self.timestamp.trim().parse::<i64>().ok()?;
        DateTime::from_timestamp_millis(millis)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Broker metadata keyed by broker ID. Empty means metadata collection is off.
pub type BrokerMetaMap = HashMap<BrokerId, BrokerMeta>;

/// Storage metrics reported for a broker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BrokerMetrics {
    #[serde(rename = "StorageFree")]
    pub storage_free: f64,
}

pub type BrokerMetricsMap = HashMap<BrokerId, BrokerMetrics>;

/// Merge broker metrics into registry metadata.
///
/// Returns the IDs, ascending, of brokers that had no metrics entry. Those
/// entries are flagged `metrics_incomplete` and keep their prior storage value.
pub fn merge_metrics(meta: &mut BrokerMetaMap, metrics: &BrokerMetricsMap) -> Vec<BrokerId> {
    let mut incomplete = Vec::new();

    for (id, entry) in meta.iter_mut() {
        match metrics.get(id) {
            Some(m) => {
                entry.storage_free = m.storage_free;
                entry.metrics_incomplete = false;
            }
            None => {
                entry.metrics_incomplete = true;
                incomplete.push(*id);
            }
        }
    }

    incomplete.sort_unstable();
    if !incomplete.is_empty() {
        tracing::warn!(brokers = ?incomplete, "storage metrics missing for brokers");
    }

    incomplete
}
