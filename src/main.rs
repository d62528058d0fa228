use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;

use trade_sim::listings::{Listing, ListingTable, LocaleTable};
use trade_sim::output::{self, RunSummary};
use trade_sim::report;
use trade_sim::sim::{self, SimConfig};

#[derive(Debug, Parser)]
#[command(
    name = "trade-sim",
    about = "Monte Carlo merchant-trade analyzer for levelled attribute offers"
)]
struct Args {
    /// Number of trials to simulate
    #[arg(long, default_value_t = 100_000)]
    trials: u64,

    /// Report destination (overwritten each run)
    #[arg(long, default_value = "trade_analysis_results.txt")]
    output: PathBuf,

    /// Listing table TOML; the built-in librarian-style table when omitted
    #[arg(long)]
    listings: Option<PathBuf>,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Shard trials across worker threads
    #[arg(long)]
    parallel: bool,

    /// Also export the aggregate entries as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Also export a JSON run summary
    #[arg(long)]
    json: Option<PathBuf>,

    /// Save the effective configuration as TOML
    #[arg(long)]
    config_out: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let table = match &args.listings {
        Some(path) => match ListingTable::load(path) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("Error loading listing table {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ListingTable::default(),
    };
    let locale = LocaleTable::from_table(&table);

    let mut config = SimConfig {
        trials: args.trials,
        seed: args.seed,
        ..SimConfig::default()
    };
    // Track whatever the table's attribute slot actually sells.
    if let Some(item) = table.slots.iter().find_map(|s| match s {
        Listing::AttributeItem { item } => Some(item.clone()),
        Listing::Commodity { .. } => None,
    }) {
        config.target_item = item;
    }

    println!(
        "Simulating {} trials across {} slots...",
        config.trials,
        table.slots.len()
    );

    let pb = ProgressBar::new(config.trials);
    pb.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} trials ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let stats = if args.parallel {
        sim::run_parallel(&table, &locale, &config, Some(&pb))
    } else {
        sim::run(&table, &locale, &config, Some(&pb))
    };
    pb.finish_and_clear();

    println!(
        "Simulation complete: {} observations across {} attribute keys.",
        stats.total_observations(),
        stats.len()
    );

    match report::save_report(&stats, config.trials, &args.output) {
        Ok(outcome) => {
            if outcome.rows_failed > 0 {
                println!(
                    "Report written to {} ({} rows, {} failed)",
                    args.output.display(),
                    outcome.rows_written,
                    outcome.rows_failed
                );
            } else {
                println!(
                    "Report written to {} ({} rows)",
                    args.output.display(),
                    outcome.rows_written
                );
            }
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error writing report: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if let Some(path) = &args.csv {
        match output::save_stats_csv(&stats, path) {
            Ok(()) => println!("CSV written to {}", path.display()),
            Err(e) => eprintln!("Error writing CSV: {}", e),
        }
    }
    if let Some(path) = &args.json {
        let summary = RunSummary::from_stats(&stats, config.trials);
        match output::save_summary_json(&summary, path) {
            Ok(()) => println!("Summary written to {}", path.display()),
            Err(e) => eprintln!("Error writing summary: {}", e),
        }
    }
    if let Some(path) = &args.config_out {
        match output::save_config_toml(&config, &table, path) {
            Ok(()) => println!("Config written to {}", path.display()),
            Err(e) => eprintln!("Error writing config: {}", e),
        }
    }

    ExitCode::SUCCESS
}
