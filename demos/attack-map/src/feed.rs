use std::collections::HashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use globe_engine::*;

use crate::countries;

const CATEGORY_BASELINE: [(AttackCategory, u64); 5] = [
    (AttackCategory::Dos, 61069),
    (AttackCategory::Malware, 73765),
    (AttackCategory::Phishing, 11545),
    (AttackCategory::Ransomware, 19150),
    (AttackCategory::SqlInjection, 2319),
];

/// Polls further behind than this many intervals are not caught up.
const MAX_CATCH_UP: u32 = 10;

/// Tunables for the simulated feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Seconds between generation attempts.
    pub interval: f64,
    /// Chance that an attempt produces an attack.
    pub probability: f64,
    pub seed: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            interval: 1.0,
            probability: 0.7,
            seed: 0x5eed_a77a,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct CountryCounters {
    received: u64,
    sent: u64,
}

/// A random attack generator standing in for a live threat feed.
pub struct SimulatedFeed {
    config: FeedConfig,
    countries: CountryTable,
    codes: Vec<String>,
    rng: ChaCha8Rng,
    next_at: f64,
    next_id: u64,
    categories: Vec<(AttackCategory, u64)>,
    per_country: HashMap<String, CountryCounters>,
}

impl SimulatedFeed {
    pub fn new() -> Self {
        let countries = match countries::load() {
            Ok(table) => table,
            Err(e) => {
                log::error!("attack-map: country table unreadable ({}), feed stays idle", e);
                CountryTable::default()
            }
        };
        Self::with_config(countries, FeedConfig::default())
    }

    pub fn with_config(countries: CountryTable, config: FeedConfig) -> Self {
        let codes: Vec<String> = countries.codes().map(str::to_string).collect();
        let per_country = countries::BASELINE
            .iter()
            .map(|&(code, received, sent)| (code.to_string(), CountryCounters { received, sent }))
            .collect();

        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_at: config.interval,
            next_id: 1,
            categories: CATEGORY_BASELINE.to_vec(),
            per_country,
            countries,
            codes,
            config,
        }
    }

    /// Attacks sent from `code` so far.
    pub fn sent(&self, code: &str) -> u64 {
        self.per_country.get(code).map_or(0, |c| c.sent)
    }

    /// Attacks received by `code` so far.
    pub fn received(&self, code: &str) -> u64 {
        self.per_country.get(code).map_or(0, |c| c.received)
    }

    pub fn category_count(&self, category: &AttackCategory) -> u64 {
        self.categories
            .iter()
            .find(|(c, _)| c == category)
            .map_or(0, |(_, n)| *n)
    }

    fn generate(&mut self, now: f64) -> Option<AttackEvent> {
        let n = self.codes.len();
        if n < 2 {
            return None;
        }
        let src = self.rng.gen_range(0..n);
        // Pick from the other n - 1 and skip over the source.
        let mut dst = self.rng.gen_range(0..n - 1);
        if dst >= src {
            dst += 1;
        }
        let source = self.countries.endpoint(&self.codes[src])?;
        let target = self.countries.endpoint(&self.codes[dst])?;

        let slot = self.rng.gen_range(0..self.categories.len());
        let category = self.categories[slot].0.clone();
        let intensity = self.rng.gen_range(1..=MAX_INTENSITY);

        self.categories[slot].1 += 1;
        self.per_country.entry(source.country_code.clone()).or_default().sent += 1;
        self.per_country.entry(target.country_code.clone()).or_default().received += 1;

        let id = AttackId(self.next_id);
        self.next_id += 1;
        Some(AttackEvent::new(id, source, target, category, intensity, now))
    }
}

impl Default for SimulatedFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for SimulatedFeed {
    fn poll(&mut self, now: f64) -> Vec<AttackEvent> {
        let interval = self.config.interval.max(1e-3);
        let behind = now - self.next_at;
        if behind > interval * MAX_CATCH_UP as f64 {
            log::debug!("attack-map: feed {:.1}s behind, skipping ahead", behind);
            self.next_at = now;
        }

        let mut events = Vec::new();
        while now >= self.next_at {
            self.next_at += interval;
            if self.rng.gen_bool(self.config.probability.clamp(0.0, 1.0)) {
                events.extend(self.generate(now));
            }
        }
        events
    }

    fn stats(&self, limit: usize) -> StatsSnapshot {
        let top_countries = self
            .per_country
            .iter()
            .map(|(code, counters)| CountryStat {
                code: code.clone(),
                name: self.countries.name(code).unwrap_or(code.as_str()).to_string(),
                attacks: counters.received,
            })
            .collect();
        let categories = self
            .categories
            .iter()
            .map(|(category, count)| CategoryStat { category: category.clone(), count: *count })
            .collect();
        StatsSnapshot { top_countries, categories }.ranked(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(probability: f64) -> SimulatedFeed {
        let config = FeedConfig { probability, ..FeedConfig::default() };
        SimulatedFeed::with_config(countries::load().unwrap(), config)
    }

    #[test]
    fn nothing_before_first_interval() {
        let mut f = feed(1.0);
        assert!(f.poll(0.0).is_empty());
        assert!(f.poll(0.99).is_empty());
        assert_eq!(f.poll(1.0).len(), 1);
    }

    #[test]
    fn one_attempt_per_interval() {
        let mut f = feed(1.0);
        let events = f.poll(5.0);
        assert_eq!(events.len(), 5);
        let ids: Vec<u64> = events.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn zero_probability_is_silent() {
        let mut f = feed(0.0);
        assert!(f.poll(30.0).is_empty());
    }

    #[test]
    fn events_are_well_formed() {
        let mut f = feed(1.0);
        for e in f.poll(10.0) {
            assert_ne!(e.source.country_code, e.target.country_code);
            assert!((1..=10).contains(&e.intensity));
            assert!(AttackCategory::KNOWN.contains(&e.category));
            assert!(!e.target.country.is_empty());
            assert_eq!(e.timestamp, 10.0);
        }
    }

    #[test]
    fn counters_follow_generated_events() {
        let mut f = feed(1.0);
        let before_dos = f.category_count(&AttackCategory::Dos);
        let events = f.poll(3.0);
        let dos = events.iter().filter(|e| e.category == AttackCategory::Dos).count() as u64;
        assert_eq!(f.category_count(&AttackCategory::Dos), before_dos + dos);

        let us_received = events.iter().filter(|e| e.target.country_code == "US").count() as u64;
        assert_eq!(f.received("US"), 85634 + us_received);
        let mx_sent = events.iter().filter(|e| e.source.country_code == "MX").count() as u64;
        assert_eq!(f.sent("MX"), mx_sent);
    }

    #[test]
    fn stats_are_ranked_and_limited() {
        let f = feed(1.0);
        let stats = f.stats(3);
        let codes: Vec<&str> = stats.top_countries.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["US", "RU", "CN"]);
        assert_eq!(stats.top_countries[0].name, "United States");
        assert_eq!(stats.categories[0].category, AttackCategory::Malware);
        assert_eq!(stats.categories.len(), 5);
    }

    #[test]
    fn config_parses_with_defaults() {
        let config: FeedConfig = serde_json::from_str(r#"{ "probability": 0.25 }"#).unwrap();
        assert_eq!(config.probability, 0.25);
        assert_eq!(config.interval, 1.0);
    }

    #[test]
    fn long_stall_does_not_flood() {
        let mut f = feed(1.0);
        let events = f.poll(3600.0);
        assert!(events.len() <= 1);
    }
}
