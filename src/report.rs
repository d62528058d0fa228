use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::stats::{TradeStat, TradeStats};

/// The one fatal report failure: the destination cannot be created.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot open report destination {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcome of a best-effort report write.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    pub rows_written: usize,
    pub rows_failed: usize,
}

fn emit<W: Write>(w: &mut W, line: &str) -> io::Result<()> {
    writeln!(w, "{}", line)
}

/// One entry row in the fixed-width layout.
fn format_row(stat: &TradeStat) -> String {
    let name = format!("{}:{}", stat.display_name, stat.canonical_key);
    let (cost_a_item, cost_a_qty, cost_b_item, cost_b_qty) = match &stat.best_offer {
        Some(offer) => (
            offer.cost_a.item.as_str(),
            offer.cost_a.quantity,
            offer.cost_b.as_ref().map_or("none", |p| p.item.as_str()),
            offer.cost_b.as_ref().map_or(0, |p| p.quantity),
        ),
        None => ("none", 0, "none", 0),
    };
    format!(
        "{:<40} | {:<6} | {:<10} | {:<12} | {:<4} | {:<12} | {:<4} | {}",
        name,
        stat.max_level,
        stat.count,
        cost_a_item,
        cost_a_qty,
        cost_b_item,
        cost_b_qty,
        stat.description.as_deref().unwrap_or(""),
    )
}

/// Per-level distribution line, levels ascending.
fn format_distribution(stat: &TradeStat) -> String {
    let mut line = String::from("  level distribution: ");
    for (level, n) in &stat.level_counts {
        let percent = *n as f64 * 100.0 / stat.count as f64;
        line.push_str(&format!("Lv{}: {:.2}%  ", level, percent));
    }
    line
}

/// Write the full report to `w`. Entries rank by count descending with
/// creation-order ties; a failed line is logged and skipped, and the
/// remaining rows still go out.
pub fn write_report<W: Write>(stats: &TradeStats, trials: u64, w: &mut W) -> ReportOutcome {
    let mut outcome = ReportOutcome::default();

    let header = [
        format!(
            "==================== trade statistics ({} trials) ====================",
            trials
        ),
        format!(
            "{:<40} | {:<6} | {:<10} | {:<12} | {:<4} | {:<12} | {:<4} | {}",
            "name(:key)", "level", "count", "currency 1", "qty", "currency 2", "qty", "description"
        ),
        "-".repeat(130),
    ];
    for line in &header {
        if let Err(e) = emit(w, line) {
            log::warn!("failed to write report header line: {}", e);
        }
    }

    for stat in stats.entries_by_count() {
        let row = format_row(stat);
        let dist = format_distribution(stat);
        match emit(w, &row).and_then(|()| emit(w, &dist)) {
            Ok(()) => outcome.rows_written += 1,
            Err(e) => {
                outcome.rows_failed += 1;
                log::warn!("failed to write row for {}: {}", stat.canonical_key, e);
            }
        }
    }

    if let Err(e) = emit(
        w,
        "==================== end of trade statistics ====================",
    ) {
        log::warn!("failed to write report footer: {}", e);
    }
    outcome
}

/// Write the report to a file, overwriting any previous run's output.
/// Only the open failure is fatal; everything past it is best-effort.
pub fn save_report(
    stats: &TradeStats,
    trials: u64,
    path: &Path,
) -> Result<ReportOutcome, ReportError> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file = File::create(path).map_err(|source| ReportError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    let outcome = write_report(stats, trials, &mut writer);
    if let Err(e) = writer.flush() {
        log::warn!("failed to flush report: {}", e);
    }
    Ok(outcome)
}
