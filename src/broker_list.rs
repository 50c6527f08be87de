use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::ops::Deref;
use crate::models::{Broker, BrokerId};

/// Ascending `used`, ties by ascending ID.
pub fn by_count(a: &Broker, b: &Broker) -> Ordering {
    a.used.cmp(&b.used).then_with(|| a.id.cmp(&b.id))
}

/// Descending `storage_free`, ties by ascending ID.
pub fn by_storage(a: &Broker, b: &Broker) -> Ordering {
    b.storage_free
        .total_cmp(&a.storage_free)
        .then_with(|| a.id.cmp(&b.id))
}

/// Ascending ID.
pub fn by_id(a: &Broker, b: &Broker) -> Ordering {
    a.id.cmp(&b.id)
}

/// An ordered selection of brokers borrowed from a `BrokerMap`.
///
/// Order only comes from the sort methods; a list built from a map starts
/// out in arbitrary order.
#[derive(Debug, Clone, Default)]
pub struct BrokerList<'a> {
    brokers: Vec<&'a Broker>,
}

impl<'a> BrokerList<'a> {
    pub fn new() -> Self {
        Self { brokers: Vec::new() }
    }

    pub fn push(&mut self, broker: &'a Broker) {
        self.brokers.push(broker);
    }

    /// Sort by an explicit total order.
    pub fn sort_with<F>(&mut self, mut compare: F)
    where
        F: FnMut(&Broker, &Broker) -> Ordering,
    {
        self.brokers.sort_by(|a, b| compare(*a, *b));
    }

    pub fn sort_by_count(&mut self) {
        self.sort_with(by_count);
    }

    pub fn sort_by_storage(&mut self) {
        self.sort_with(by_storage);
    }

    pub fn sort_by_id(&mut self) {
        self.sort_with(by_id);
    }

    /// Sort by count, then shuffle each run of brokers sharing the same
    /// `used` value with a generator seeded from `seed`.
    ///
    /// Repeated planning runs would otherwise always favor the lowest ID
    /// among equally loaded brokers. The same seed and input always give the
    /// same order. Lists of two or fewer brokers are only sorted.
    pub fn sort_pseudo_shuffle(&mut self, seed: u64) {
        self.sort_by_count();

        if self.brokers.len() <= 2 {
            return;
        }

        let mut rng = StdRng::seed_from_u64(seed);
        self.shuffle_runs(&mut rng);
    }

    // Runs never cross a change in `used`.
    fn shuffle_runs<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for run in self.brokers.chunk_by_mut(|a, b| a.used == b.used) {
            run.shuffle(rng);
        }
    }

    pub fn ids(&self) -> Vec<BrokerId> {
        self.brokers.iter().map(|b| b.id).collect()
    }
}

impl<'a> Deref for BrokerList<'a> {
    type Target = [&'a Broker];

    fn deref(&self) -> &Self::Target {
        &self.brokers
    }
}

impl<'a> FromIterator<&'a Broker> for BrokerList<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Broker>>(iter: I) -> Self {
        Self {
            brokers: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for BrokerList<'a> {
    type Item = &'a Broker;
    type IntoIter = std::vec::IntoIter<&'a Broker>;

    fn into_iter(self) -> Self::IntoIter {
        self.brokers.into_iter()
    }
}
