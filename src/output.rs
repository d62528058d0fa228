use chrono::Local;
use serde::Serialize;
use std::path::Path;

use crate::listings::ListingTable;
use crate::sim::SimConfig;
use crate::stats::TradeStats;

/// Machine-readable run summary saved beside the text report.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub trials: u64,
    pub distinct_keys: usize,
    pub total_observations: u64,
    pub top_key: Option<String>,
    pub top_count: u64,
}

impl RunSummary {
    pub fn from_stats(stats: &TradeStats, trials: u64) -> Self {
        let ranked = stats.entries_by_count();
        let top = ranked.first();
        RunSummary {
            generated_at: Local::now().to_rfc3339(),
            trials,
            distinct_keys: stats.len(),
            total_observations: stats.total_observations(),
            top_key: top.map(|s| s.canonical_key.clone()),
            top_count: top.map(|s| s.count).unwrap_or(0),
        }
    }
}

/// Save one CSV row per aggregate entry, ranked as in the report.
pub fn save_stats_csv(stats: &TradeStats, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([
        "name",
        "key",
        "max_level",
        "count",
        "cost1_item",
        "cost1_qty",
        "cost2_item",
        "cost2_qty",
        "levels",
        "description",
    ])?;

    for stat in stats.entries_by_count() {
        let (cost_a_item, cost_a_qty, cost_b_item, cost_b_qty) = match &stat.best_offer {
            Some(offer) => (
                offer.cost_a.item.clone(),
                offer.cost_a.quantity,
                offer
                    .cost_b
                    .as_ref()
                    .map_or_else(|| "none".to_string(), |p| p.item.clone()),
                offer.cost_b.as_ref().map_or(0, |p| p.quantity),
            ),
            None => ("none".to_string(), 0, "none".to_string(), 0),
        };
        let levels = stat
            .level_counts
            .iter()
            .map(|(level, n)| format!("{}:{}", level, n))
            .collect::<Vec<_>>()
            .join(";");

        wtr.write_record(&[
            stat.display_name.clone(),
            stat.canonical_key.clone(),
            stat.max_level.to_string(),
            stat.count.to_string(),
            cost_a_item,
            cost_a_qty.to_string(),
            cost_b_item,
            cost_b_qty.to_string(),
            levels,
            stat.description.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the JSON run summary.
pub fn save_summary_json(
    summary: &RunSummary,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(summary)?)?;
    Ok(())
}

#[derive(Serialize)]
struct ConfigDump<'a> {
    sim: &'a SimConfig,
    listings: &'a ListingTable,
}

/// Save the effective configuration to TOML format.
pub fn save_config_toml(
    config: &SimConfig,
    table: &ListingTable,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(&ConfigDump {
        sim: config,
        listings: table,
    })?;
    std::fs::write(path, text)?;
    Ok(())
}
