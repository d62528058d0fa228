use std::collections::{BTreeMap, HashMap};

use crate::offer::Offer;

/// Sentinel stored when a description lookup finds nothing.
pub const NO_DESCRIPTION: &str = "no description (missing lang entry)";

/// Running statistics for one canonical attribute key.
#[derive(Debug, Clone)]
pub struct TradeStat {
    /// Stripped display name; the last observation wins.
    pub display_name: String,
    pub canonical_key: String,
    /// Highest level seen so far; never decreases.
    pub max_level: u32,
    pub count: u64,
    /// The offer recorded when `max_level` was last raised. Ties at the
    /// maximum never replace it.
    pub best_offer: Option<Offer>,
    /// Resolved at most once per key; `NO_DESCRIPTION` on a miss.
    pub description: Option<String>,
    /// Level -> occurrence count; values always sum to `count`.
    pub level_counts: BTreeMap<u32, u64>,
}

impl TradeStat {
    fn new(key: &str) -> Self {
        TradeStat {
            display_name: String::new(),
            canonical_key: key.to_string(),
            max_level: 0,
            count: 0,
            best_offer: None,
            description: None,
            level_counts: BTreeMap::new(),
        }
    }
}

/// Aggregated statistics for a whole run, keyed by canonical attribute
/// identity. Entries are created on first observation and never removed;
/// creation order is preserved for the report's stable tie break.
#[derive(Debug, Default)]
pub struct TradeStats {
    entries: Vec<TradeStat>,
    index: HashMap<String, usize>,
}

impl TradeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&TradeStat> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Entries in creation order.
    pub fn entries(&self) -> &[TradeStat] {
        &self.entries
    }

    /// Total observations across all keys.
    pub fn total_observations(&self) -> u64 {
        self.entries.iter().map(|s| s.count).sum()
    }

    /// Record one observation of `key` at `level`, with `offer` as the
    /// best-offer candidate. `resolve` is consulted at most once per key,
    /// on the first observation; a miss is stored as `NO_DESCRIPTION` and
    /// never retried.
    pub fn observe<F>(&mut self, key: &str, display_name: &str, level: u32, offer: &Offer, resolve: F)
    where
        F: FnOnce() -> Option<String>,
    {
        let idx = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.entries.push(TradeStat::new(key));
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        let stat = &mut self.entries[idx];

        stat.display_name = display_name.to_string();
        stat.count += 1;
        *stat.level_counts.entry(level).or_insert(0) += 1;

        if stat.description.is_none() {
            stat.description = Some(resolve().unwrap_or_else(|| NO_DESCRIPTION.to_string()));
        }

        // Strictly higher only; an equal level keeps the earlier offer.
        if level > stat.max_level {
            stat.max_level = level;
            stat.best_offer = Some(offer.clone());
        }
    }

    /// Entries sorted by count descending; ties keep creation order.
    pub fn entries_by_count(&self) -> Vec<&TradeStat> {
        let mut ranked: Vec<&TradeStat> = self.entries.iter().collect();
        ranked.sort_by_key(|s| std::cmp::Reverse(s.count));
        ranked
    }

    /// Fold another aggregate into this one, key-wise. Used by the
    /// parallel driver to combine shard-local results: counts and
    /// histograms add, a strictly higher level brings its offer along,
    /// the first resolved description sticks, and `other`'s new keys
    /// append after existing ones in their own creation order.
    pub fn merge(&mut self, other: TradeStats) {
        for mut incoming in other.entries {
            match self.index.get(&incoming.canonical_key) {
                Some(&i) => {
                    let stat = &mut self.entries[i];
                    stat.display_name = incoming.display_name;
                    stat.count += incoming.count;
                    for (level, n) in incoming.level_counts {
                        *stat.level_counts.entry(level).or_insert(0) += n;
                    }
                    if incoming.max_level > stat.max_level {
                        stat.max_level = incoming.max_level;
                        stat.best_offer = incoming.best_offer.take();
                    }
                    if stat.description.is_none() {
                        stat.description = incoming.description.take();
                    }
                }
                None => {
                    self.index
                        .insert(incoming.canonical_key.clone(), self.entries.len());
                    self.entries.push(incoming);
                }
            }
        }
    }
}
