use trade_sim::listings::ListingTable;
use trade_sim::offer::{Offer, Price};
use trade_sim::output::{save_config_toml, save_stats_csv, save_summary_json, RunSummary};
use trade_sim::sim::SimConfig;
use trade_sim::stats::TradeStats;

fn seeded_stats() -> TradeStats {
    let offer = Offer {
        item: "minecraft:enchanted_book".to_string(),
        attributes: Vec::new(),
        cost_a: Price {
            item: "Emerald".to_string(),
            quantity: 12,
        },
        cost_b: Some(Price {
            item: "Book".to_string(),
            quantity: 1,
        }),
    };
    let mut stats = TradeStats::new();
    for _ in 0..30 {
        stats.observe("minecraft:fortune", "Fortune", 2, &offer, || {
            Some("Increases block drops.".to_string())
        });
    }
    for _ in 0..70 {
        stats.observe("minecraft:mending", "Mending", 1, &offer, || None);
    }
    stats
}

#[test]
fn csv_export_contains_ranked_entries() {
    let stats = seeded_stats();
    let path = std::env::temp_dir().join("trade_sim_test_stats.csv");
    save_stats_csv(&stats, &path).expect("csv export should succeed");

    let content = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let mut lines = content.lines();
    assert!(lines.next().unwrap().starts_with("name,key,max_level,count"));
    let first = lines.next().unwrap();
    assert!(
        first.starts_with("Mending,minecraft:mending,1,70"),
        "higher-count entry must rank first: {}",
        first
    );
    let second = lines.next().unwrap();
    assert!(second.starts_with("Fortune,minecraft:fortune,2,30"), "{}", second);
    assert!(second.contains("2:30"), "packed histogram missing: {}", second);
}

#[test]
fn json_summary_carries_run_facts() {
    let stats = seeded_stats();
    let summary = RunSummary::from_stats(&stats, 100);

    let path = std::env::temp_dir().join("trade_sim_test_summary.json");
    save_summary_json(&summary, &path).expect("json export should succeed");

    let content = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["trials"], 100);
    assert_eq!(value["distinct_keys"], 2);
    assert_eq!(value["total_observations"], 100);
    assert_eq!(value["top_key"], "minecraft:mending");
    assert_eq!(value["top_count"], 70);
    assert!(value["generated_at"].as_str().unwrap().contains('T'));
}

#[test]
fn config_dump_round_trips_through_toml() {
    let config = SimConfig::default();
    let table = ListingTable::default();

    let path = std::env::temp_dir().join("trade_sim_test_config.toml");
    save_config_toml(&config, &table, &path).expect("config export should succeed");

    let content = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let value: toml::Value = toml::from_str(&content).unwrap();
    assert_eq!(value["sim"]["trials"].as_integer(), Some(100_000));
    assert_eq!(
        value["sim"]["target_item"].as_str(),
        Some("minecraft:enchanted_book")
    );
    assert!(value["listings"]["attributes"].as_array().unwrap().len() >= 10);
}
