use tracing::info;
use crate::broker_list::BrokerList;
use crate::broker_map::BrokerMap;
use crate::config::{PlannerConfig, SelectionOrder};
use crate::models::{BrokerId, BrokerMetaMap, PartitionMap, PartitionSizes};
use crate::status::UpdateOutcome;
use crate::Result;

/// Prepares the broker model a placement run works against
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Build the broker map for the current assignment and reconcile it with
    /// the target broker list
    pub fn prepare(
        &self,
        pm: &PartitionMap,
        target: &[BrokerId],
        meta: &BrokerMetaMap,
    ) -> (BrokerMap, UpdateOutcome) {
        let mut brokers = BrokerMap::from_partition_map(pm, meta, self.config.force_rebuild);
        let outcome = brokers.update(target, meta);

        info!(
            brokers = brokers.len() - 1,
            target = target.len(),
            metadata = !meta.is_empty(),
            changes = outcome.status.changes(),
            "prepared broker map"
        );

        (brokers, outcome)
    }

    /// Return the storage held by every partition in `pm` to its current
    /// replica brokers, as if all of them were about to be placed again
    pub fn release_storage<S>(&self, brokers: &mut BrokerMap, pm: &PartitionMap, sizes: &S) -> Result<()>
    where
        S: PartitionSizes + ?Sized,
    {
        brokers.sub_storage(pm, sizes, |_| true)
    }

    /// Brokers eligible for new replicas, in the configured order
    pub fn candidates<'a>(&self, brokers: &'a BrokerMap) -> BrokerList<'a> {
        let mut list = brokers.select(|b| b.is_placeable());

        match self.config.selection {
            SelectionOrder::ByCount => list.sort_by_count(),
            SelectionOrder::ByStorage => list.sort_by_storage(),
            SelectionOrder::ById => list.sort_by_id(),
            SelectionOrder::PseudoShuffle => list.sort_pseudo_shuffle(self.config.seed),
        }

        list
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

/// Builder for creating a Planner with a fluent API
pub struct PlannerBuilder {
    config: PlannerConfig,
}

impl PlannerBuilder {
    pub fn new() -> Self {
        Self {
            config: PlannerConfig::default(),
        }
    }

    pub fn force_rebuild(mut self, force: bool) -> Self {
        self.config.force_rebuild = force;
        self
    }

    pub fn with_selection(mut self, selection: SelectionOrder) -> Self {
        self.config.selection = selection;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn build(self) -> Planner {
        Planner::new(self.config)
    }
}

impl Default for PlannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BrokerMeta, Partition, PartitionMeta, PartitionMetaMap, STUB_BROKER_ID};

    fn partition_map() -> PartitionMap {
        PartitionMap::new(vec![
            Partition::new("orders", 0, vec![1, 2]),
            Partition::new("orders", 1, vec![2, 3]),
            Partition::new("orders", 2, vec![3, 2]),
        ])
    }

    fn metadata(ids: &[BrokerId]) -> BrokerMetaMap {
        ids.iter()
            .map(|&id| {
                (
                    id,
                    BrokerMeta {
                        rack: format!("rack-{}", id),
                        storage_free: 100.0 * id as f64,
                        ..Default::default()
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_planner_builder() {
        let planner = PlannerBuilder::new()
            .force_rebuild(true)
            .with_selection(SelectionOrder::PseudoShuffle)
            .with_seed(5)
            .build();

        let config = planner.config();
        assert!(config.force_rebuild);
        assert_eq!(config.selection, SelectionOrder::PseudoShuffle);
        assert_eq!(config.seed, 5);
    }

    #[test]
    fn test_prepare_replaces_removed_broker() {
        let planner = Planner::default();

        let (brokers, outcome) = planner.prepare(&partition_map(), &[2, 3, 4], &metadata(&[1, 2, 3, 4]));

        assert_eq!(outcome.status.replace, 1);
        assert_eq!(outcome.status.new, 1);
        assert!(brokers.get(1).unwrap().replace);
        assert_eq!(brokers.get(2).unwrap().used, 3);
        assert!(brokers.get(STUB_BROKER_ID).unwrap().replace);

        let candidates = planner.candidates(&brokers);
        assert_eq!(candidates.ids(), vec![4, 3, 2]);
    }

    #[test]
    fn test_prepare_force_rebuild() {
        let planner = Planner::new(PlannerConfig::for_force_rebuild());

        let (brokers, outcome) = planner.prepare(&partition_map(), &[1, 2, 3], &BrokerMetaMap::new());

        assert!(!outcome.status.changes());
        assert!(brokers.iter().all(|b| b.used == 0));
        assert_eq!(planner.candidates(&brokers).ids(), vec![1, 2, 3]);
    }

    #[test]
    fn test_candidates_by_storage() {
        let planner = Planner::new(PlannerConfig::for_storage_placement());
        let (brokers, _) = planner.prepare(&partition_map(), &[1, 2, 3], &metadata(&[1, 2, 3]));

        assert_eq!(planner.candidates(&brokers).ids(), vec![3, 2, 1]);
    }

    #[test]
    fn test_candidates_skip_missing_and_removed_brokers() {
        let pm = PartitionMap::new(vec![
            Partition::new("orders", 0, vec![1, 2]),
            Partition::new("orders", 1, vec![3, 2]),
            Partition::new("orders", 2, vec![4, 1]),
        ]);

        let planner = Planner::default();
        let (brokers, outcome) = planner.prepare(&pm, &[1, 2, 3, 5], &metadata(&[1, 2, 4, 5]));
        assert_eq!(outcome.status.missing, 1);
        assert_eq!(outcome.status.replace, 1);
        assert_eq!(outcome.status.new, 1);

        let candidates = planner.candidates(&brokers);
        assert_eq!(candidates.ids(), vec![5, 1, 2]);
        assert!(candidates.iter().all(|b| b.is_placeable()));

        let excluded: Vec<_> = brokers
            .iter()
            .filter(|b| !candidates.ids().contains(&b.id))
            .map(|b| b.id)
            .collect();
        for id in excluded {
            assert!(!brokers.get(id).unwrap().is_placeable(), "broker {}", id);
        }
    }

    #[test]
    fn test_candidates_fair_placement_is_reproducible() {
        let pm = PartitionMap::new(
            (0..12)
                .map(|p| Partition::new("events", p, vec![p % 6 + 1]))
                .collect(),
        );
        let planner = Planner::new(PlannerConfig::for_fair_placement(2024));
        let (brokers, _) = planner.prepare(&pm, &[1, 2, 3, 4, 5, 6], &BrokerMetaMap::new());

        let first = planner.candidates(&brokers).ids();
        let second = planner.candidates(&brokers.clone()).ids();

        assert_eq!(first, second);
        let mut sorted = first.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_release_storage() {
        let pm = partition_map();
        let planner = Planner::default();
        let (mut brokers, _) = planner.prepare(&pm, &[1, 2, 3], &metadata(&[1, 2, 3]));

        let mut sizes = PartitionMetaMap::new();
        let orders = sizes.entry("orders".to_string()).or_default();
        orders.insert(0, PartitionMeta { size: 10.0 });
        orders.insert(1, PartitionMeta { size: 20.0 });
        orders.insert(2, PartitionMeta { size: 30.0 });

        planner.release_storage(&mut brokers, &pm, &sizes).unwrap();

        assert_eq!(brokers.get(1).unwrap().storage_free, 110.0);
        assert_eq!(brokers.get(2).unwrap().storage_free, 260.0);
        assert_eq!(brokers.get(3).unwrap().storage_free, 350.0);
    }
}
