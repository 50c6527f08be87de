use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};
use crate::broker_list::BrokerList;
use crate::models::{
    Broker, BrokerId, BrokerMetaMap, PartitionMap, PartitionSizes, STUB_BROKER_ID,
};
use crate::status::{BrokerStatus, UpdateOutcome};
use crate::{PlannerError, Result};

/// Brokers keyed by ID.
///
/// Cloning yields a fully independent map, so a speculative placement can be
/// tried on a clone and thrown away.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrokerMap {
    brokers: HashMap<BrokerId, Broker>,
}

impl BrokerMap {
    pub fn new() -> Self {
        Self {
            brokers: HashMap::new(),
        }
    }

    /// Build a map from the replica sets of an existing assignment.
    ///
    /// Each replica slot adds one to its broker's `used` count unless `force`
    /// is set, in which case every broker starts unloaded. Rack and storage
    /// come from `meta` where present. The stub broker 0 is always added,
    /// marked for replacement.
    pub fn from_partition_map(pm: &PartitionMap, meta: &BrokerMetaMap, force: bool) -> Self {
        let mut map = Self::new();

        for partition in &pm.partitions {
            for &id in &partition.replicas {
                let broker = map.brokers.entry(id).or_insert_with(|| Broker::new(id));

                if !force {
                    broker.used += 1;
                }

                if let Some(m) = meta.get(&id) {
                    broker.apply_meta(m);
                }
            }
        }

        map.brokers.insert(STUB_BROKER_ID, Broker::stub());

        debug!(
            brokers = map.brokers.len() - 1,
            partitions = pm.partitions.len(),
            force,
            "built broker map from partition map"
        );

        map
    }

    /// Reconcile the map with a target broker list and registry metadata.
    ///
    /// An empty `meta` means metadata collection is disabled: no broker is
    /// considered missing and new brokers are added without rack or storage
    /// figures. Passes run in a fixed order (missing, removed, added) and
    /// visit brokers by ascending ID. The stub broker is never touched.
    ///
    /// Flags already set by an earlier call are not counted again, so
    /// repeating a call with the same inputs reports no changes.
    pub fn update(&mut self, target: &[BrokerId], meta: &BrokerMetaMap) -> UpdateOutcome {
        let mut status = BrokerStatus::default();
        let mut messages = Vec::new();

        let wanted: HashSet<BrokerId> = target
            .iter()
            .copied()
            .filter(|&id| id != STUB_BROKER_ID)
            .collect();
        let existing = self.sorted_ids();

        if !meta.is_empty() {
            for id in &existing {
                if meta.contains_key(id) {
                    continue;
                }
                let Some(broker) = self.brokers.get_mut(id) else {
                    continue;
                };
                if broker.missing {
                    continue;
                }

                broker.missing = true;
                broker.new = false;

                if wanted.contains(id) {
                    broker.replace = true;
                    status.missing += 1;
                    audit(
                        &mut messages,
                        *id,
                        format!("Broker {} missing from registry, marked for replacement", id),
                    );
                } else if broker.replace {
                    status.old_missing += 1;
                    audit(&mut messages, *id, format!("Previous broker {} missing", id));
                } else {
                    // Counted as a removal below.
                    audit(&mut messages, *id, format!("Broker {} missing from registry", id));
                }
            }
        }

        for id in &existing {
            if wanted.contains(id) {
                continue;
            }
            if let Some(broker) = self.brokers.get_mut(id) {
                if broker.replace {
                    continue;
                }
                broker.replace = true;
                status.replace += 1;
                audit(&mut messages, *id, format!("Broker {} marked for removal", id));
            }
        }

        let mut additions: Vec<BrokerId> = wanted
            .into_iter()
            .filter(|id| !self.brokers.contains_key(id))
            .collect();
        additions.sort_unstable();

        for id in additions {
            let mut broker = Broker {
                new: true,
                ..Broker::new(id)
            };

            if !meta.is_empty() {
                match meta.get(&id) {
                    Some(m) => broker.apply_meta(m),
                    None => {
                        status.missing += 1;
                        audit(&mut messages, id, format!("Broker {} not found in registry", id));
                        continue;
                    }
                }
            }

            self.brokers.insert(id, broker);
            status.new += 1;
            audit(&mut messages, id, format!("New broker {}", id));
        }

        info!(%status, "broker map updated");

        UpdateOutcome { status, messages }
    }

    /// Add each partition's size back to the free storage of every replica
    /// broker for which `f` returns true, simulating the partition being
    /// moved off those brokers.
    ///
    /// Fails if a replica names a broker not in the map, or if a partition
    /// size cannot be resolved. Brokers updated before the failure keep
    /// their new values.
    pub fn sub_storage<S, F>(&mut self, pm: &PartitionMap, sizes: &S, mut f: F) -> Result<()>
    where
        S: PartitionSizes + ?Sized,
        F: FnMut(&Broker) -> bool,
    {
        for partition in &pm.partitions {
            let size = sizes.size(partition)?;

            for id in &partition.replicas {
                let broker = self.brokers.get_mut(id).ok_or_else(|| {
                    warn!(
                        broker = id,
                        topic = %partition.topic,
                        partition = partition.partition,
                        "replica references unknown broker"
                    );
                    PlannerError::BrokerNotFound(*id)
                })?;

                if f(&*broker) {
                    broker.storage_free += size;
                }
            }
        }

        Ok(())
    }

    /// Brokers for which `f` returns true, as a new map. The stub broker is
    /// never included.
    pub fn filter<F>(&self, mut f: F) -> BrokerMap
    where
        F: FnMut(&Broker) -> bool,
    {
        let brokers = self
            .brokers
            .values()
            .filter(|b| !b.is_stub() && f(*b))
            .map(|b| (b.id, b.clone()))
            .collect();

        BrokerMap { brokers }
    }

    /// Like `filter`, but borrows the matching brokers instead of copying.
    pub fn select<F>(&self, mut f: F) -> BrokerList<'_>
    where
        F: FnMut(&Broker) -> bool,
    {
        self.brokers
            .values()
            .filter(|b| !b.is_stub() && f(*b))
            .collect()
    }

    /// Every broker, stub included, in no particular order.
    pub fn list(&self) -> BrokerList<'_> {
        self.brokers.values().collect()
    }

    pub fn get(&self, id: BrokerId) -> Option<&Broker> {
        self.brokers.get(&id)
    }

    pub fn get_mut(&mut self, id: BrokerId) -> Option<&mut Broker> {
        self.brokers.get_mut(&id)
    }

    pub fn insert(&mut self, broker: Broker) -> Option<Broker> {
        self.brokers.insert(broker.id, broker)
    }

    pub fn contains(&self, id: BrokerId) -> bool {
        self.brokers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.brokers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brokers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Broker> {
        self.brokers.values()
    }

    // Real broker IDs, ascending.
    fn sorted_ids(&self) -> Vec<BrokerId> {
        let mut ids: Vec<BrokerId> = self
            .brokers
            .keys()
            .copied()
            .filter(|&id| id != STUB_BROKER_ID)
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl FromIterator<Broker> for BrokerMap {
    fn from_iter<I: IntoIterator<Item = Broker>>(iter: I) -> Self {
        Self {
            brokers: iter.into_iter().map(|b| (b.id, b)).collect(),
        }
    }
}

fn audit(messages: &mut Vec<String>, broker: BrokerId, message: String) {
    debug!(broker, "{}", message);
    messages.push(message);
}
