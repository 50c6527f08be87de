use serde::{Deserialize, Serialize};

/// How candidate brokers are ordered for selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionOrder {
    /// Least loaded first
    ByCount,
    /// Most free storage first
    ByStorage,
    /// Lowest ID first
    ById,
    /// Least loaded first, with ties shuffled by the configured seed
    PseudoShuffle,
}

/// Settings that control how a broker map is built and queried
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Ignore existing load when building from a partition map
    pub force_rebuild: bool,

    /// Candidate ordering
    pub selection: SelectionOrder,

    /// Seed for `SelectionOrder::PseudoShuffle`
    pub seed: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            force_rebuild: false,
            selection: SelectionOrder::ByCount,
            seed: 0,
        }
    }
}

impl PlannerConfig {
    /// Rebuild every partition from scratch, treating all brokers as unloaded
    pub fn for_force_rebuild() -> Self {
        Self {
            force_rebuild: true,
            ..Default::default()
        }
    }

    /// Prefer brokers with the most free storage
    pub fn for_storage_placement() -> Self {
        Self {
            selection: SelectionOrder::ByStorage,
            ..Default::default()
        }
    }

    /// Spread ties between equally loaded brokers across runs
    pub fn for_fair_placement(seed: u64) -> Self {
        Self {
            selection: SelectionOrder::PseudoShuffle,
            seed,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let default = PlannerConfig::default();
        assert!(!default.force_rebuild);
        assert_eq!(default.selection, SelectionOrder::ByCount);

        assert!(PlannerConfig::for_force_rebuild().force_rebuild);
        assert_eq!(
            PlannerConfig::for_storage_placement().selection,
            SelectionOrder::ByStorage
        );

        let fair = PlannerConfig::for_fair_placement(7);
        assert_eq!(fair.selection, SelectionOrder::PseudoShuffle);
        assert_eq!(fair.seed, 7);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{"selection": "ByStorage", "seed": 11}"#).unwrap();

        assert_eq!(config.selection, SelectionOrder::ByStorage);
        assert_eq!(config.seed, 11);
        assert!(!config.force_rebuild);
    }
}
