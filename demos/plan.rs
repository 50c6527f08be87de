use kafka_broker_planner::*;
use kafka_broker_planner::models::{PartitionMeta, STUB_BROKER_ID};
use tracing_subscriber::EnvFilter;

const CURRENT_ASSIGNMENT: &str = r#"{"version":1,"partitions":[
    {"topic":"orders","partition":0,"replicas":[1001,1002]},
    {"topic":"orders","partition":1,"replicas":[1002,1003]},
    {"topic":"orders","partition":2,"replicas":[1003,1001]},
    {"topic":"orders","partition":3,"replicas":[1001,1003]},
    {"topic":"payments","partition":0,"replicas":[1003,1002]},
    {"topic":"payments","partition":1,"replicas":[1002,1001]}]}"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Kafka Broker Planner - Example Usage\n");

    let pm = PartitionMap::from_json(CURRENT_ASSIGNMENT)?;
    let meta = sample_metadata();
    let sizes = sample_partition_sizes(&pm);

    // Retire 1002 and bring in 1004 and 1005. 1005 has not registered yet.
    let target = [1001, 1003, 1004, 1005];

    let planner = PlannerBuilder::new()
        .with_selection(SelectionOrder::PseudoShuffle)
        .with_seed(20240601)
        .build();

    println!("=== Reconciling Brokers ===");
    let (mut brokers, outcome) = planner.prepare(&pm, &target, &meta);
    for message in &outcome.messages {
        println!("  {}", message);
    }
    println!("{}", outcome.status);
    if !outcome.status.changes() {
        println!("✓ No broker changes");
    }

    println!("\n=== Broker Usage ===");
    for stats in pm.use_stats() {
        println!(
            "  Broker {}: {} leader, {} follower",
            stats.id, stats.leader, stats.follower
        );
    }

    // Storage held by partitions on retiring brokers becomes free again.
    brokers.sub_storage(&pm, &sizes, |b| b.replace)?;

    println!("\n=== Brokers ===");
    let mut all = brokers.list();
    all.sort_by_id();
    for broker in all.iter().filter(|b| b.id != STUB_BROKER_ID) {
        println!(
            "  {:>5} rack={:<4} used={} free={:.0}GB replace={} missing={} new={}",
            broker.id,
            broker.locality,
            broker.used,
            broker.storage_free / 1e9,
            broker.replace,
            broker.missing,
            broker.new
        );
    }

    println!("\n=== Candidate Order (seeded shuffle) ===");
    let candidates = planner.candidates(&brokers);
    println!("  {:?}", candidates.ids());

    let mut by_storage = brokers.select(|b| !b.replace);
    by_storage.sort_by_storage();
    println!("\n=== Candidate Order (storage) ===");
    println!("  {:?}", by_storage.ids());

    // Speculative placements happen on a copy.
    let mut attempt = brokers.clone();
    if let Some(first) = candidates.first() {
        if let Some(b) = attempt.get_mut(first.id) {
            b.used += 1;
        }
        println!(
            "\nTrial placement on {}: used {} -> {}",
            first.id,
            first.used,
            attempt.get(first.id).map(|b| b.used).unwrap_or_default()
        );
    }

    Ok(())
}

fn sample_metadata() -> BrokerMetaMap {
    [
        (1001, "a", 800e9),
        (1002, "b", 650e9),
        (1003, "c", 720e9),
        (1004, "b", 1000e9),
    ]
    .into_iter()
    .map(|(id, rack, free)| {
        (
            id,
            BrokerMeta {
                rack: rack.to_string(),
                storage_free: free,
                host: format!("kafka-{}", id),
                port: 9092,
                ..Default::default()
            },
        )
    })
    .collect()
}

fn sample_partition_sizes(pm: &PartitionMap) -> PartitionMetaMap {
    let mut sizes = PartitionMetaMap::new();
    for (i, p) in pm.partitions.iter().enumerate() {
        sizes
            .entry(p.topic.clone())
            .or_default()
            .insert(p.partition, PartitionMeta { size: (i as f64 + 1.0) * 25e9 });
    }
    sizes
}
