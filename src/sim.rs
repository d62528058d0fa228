use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::canonical::{description_key, strip_level_suffix};
use crate::offer::{Offer, OfferSource, TextResolver};
use crate::stats::TradeStats;

/// Configuration for one simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct SimConfig {
    /// Number of independent trials.
    pub trials: u64,
    /// Only offers producing this item are aggregated.
    pub target_item: String,
    pub seed: u64,
    /// Trials per shard in the parallel driver.
    pub chunk_size: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            trials: 100_000,
            target_item: "minecraft:enchanted_book".to_string(),
            seed: 42,
            chunk_size: 1024,
        }
    }
}

/// Run `config.trials` trials sequentially, feeding every attribute of
/// every target-item offer through the canonicalizer into the aggregate.
pub fn run<S, L>(
    source: &S,
    locale: &L,
    config: &SimConfig,
    progress: Option<&ProgressBar>,
) -> TradeStats
where
    S: OfferSource + ?Sized,
    L: TextResolver + ?Sized,
{
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut stats = TradeStats::new();

    for _ in 0..config.trials {
        run_trial(source, locale, config, &mut rng, &mut stats);
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }
    stats
}

/// Parallel variant: trials are sharded into chunks, each chunk owns an
/// RNG seeded from its index and a private aggregate, and shards merge in
/// chunk order. Counters, histograms and the max-level/best-offer pair are
/// only ever touched by one shard, so no update can tear; the result is
/// deterministic for a fixed seed and chunk size.
pub fn run_parallel<S, L>(
    source: &S,
    locale: &L,
    config: &SimConfig,
    progress: Option<&ProgressBar>,
) -> TradeStats
where
    S: OfferSource + Sync + ?Sized,
    L: TextResolver + Sync + ?Sized,
{
    let chunk = config.chunk_size.max(1);
    let chunks = (config.trials + chunk - 1) / chunk;

    let shards: Vec<TradeStats> = (0..chunks)
        .into_par_iter()
        .map(|ci| {
            let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(ci));
            let mut stats = TradeStats::new();
            let trials = chunk.min(config.trials - ci * chunk);
            for _ in 0..trials {
                run_trial(source, locale, config, &mut rng, &mut stats);
            }
            if let Some(pb) = progress {
                pb.inc(trials);
            }
            stats
        })
        .collect();

    let mut merged = TradeStats::new();
    for shard in shards {
        merged.merge(shard);
    }
    merged
}

/// One trial: consult every slot once, keep offers for the target item.
/// Nothing that happens inside a trial aborts the batch.
fn run_trial<S, L>(
    source: &S,
    locale: &L,
    config: &SimConfig,
    rng: &mut StdRng,
    stats: &mut TradeStats,
) where
    S: OfferSource + ?Sized,
    L: TextResolver + ?Sized,
{
    for slot in 0..source.slot_count() {
        match source.sample(slot, rng) {
            Some(offer) if offer.item == config.target_item => {
                observe_offer(&offer, locale, stats);
            }
            // Other merchandise, not tracked.
            Some(_) => {}
            None => log::debug!("slot {} produced no offer", slot),
        }
    }
}

/// One observation per attribute, all sharing the offer as best-offer
/// candidate.
fn observe_offer<L>(offer: &Offer, locale: &L, stats: &mut TradeStats)
where
    L: TextResolver + ?Sized,
{
    if offer.attributes.is_empty() {
        log::debug!("target offer without attributes, skipped");
        return;
    }
    for attr in &offer.attributes {
        let clean = strip_level_suffix(&attr.full_name);
        let key = description_key(&attr.tag);
        stats.observe(&attr.tag, &clean, attr.level, offer, || locale.resolve(&key));
    }
}
