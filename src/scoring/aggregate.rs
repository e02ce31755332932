// src/scoring/aggregate.rs
//! Cluster-level scores: freshness, velocity, source diversity, trust aggregate, and
//! the combined ranking score.
//!
//! `now` is always passed in; nothing here reads the clock.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::article::Article;
use crate::config::ClusterScoreConfig;
use crate::scoring::validity::clamp_score;

const MS_PER_HOUR: f64 = 3_600_000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusterScores {
    pub freshness: u8,
    pub velocity: u8,
    pub source_diversity: u8,
    pub trust_aggregate: u8,
    pub score: u8,
}

/// Score one cluster's (already validity-scored) members. Empty input scores all zero.
pub fn score_cluster(articles: &[Article], now: DateTime<Utc>, cfg: &ClusterScoreConfig) -> ClusterScores {
    if articles.is_empty() {
        return ClusterScores::default();
    }

    let (oldest, newest) = time_bounds(articles);

    let freshness = freshness(newest, now, cfg);
    let velocity = velocity(articles.len(), oldest, newest, cfg);
    let source_diversity = source_diversity(articles, cfg);
    let trust_aggregate = trust_aggregate(articles, cfg);

    let w = cfg.weights;
    let score = clamp_score(
        (f64::from(freshness) * w.freshness
            + f64::from(velocity) * w.velocity
            + f64::from(source_diversity) * w.source_diversity
            + f64::from(trust_aggregate) * w.trust_aggregate)
            .round(),
    );

    ClusterScores {
        freshness,
        velocity,
        source_diversity,
        trust_aggregate,
        score,
    }
}

/// Oldest and newest publication time. Caller guarantees a non-empty slice.
pub fn time_bounds(articles: &[Article]) -> (DateTime<Utc>, DateTime<Utc>) {
    let mut times = articles.iter().map(Article::published);
    let first = times.next().unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    times.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)))
}

fn hours_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / MS_PER_HOUR
}

/// 100 minus `decay` points per hour of age of the newest member, floored at 0.
pub fn freshness(newest: DateTime<Utc>, now: DateTime<Utc>, cfg: &ClusterScoreConfig) -> u8 {
    let age_hours = hours_between(newest, now);
    clamp_score((100.0 - age_hours * cfg.freshness_decay_per_hour).round())
}

/// Members per hour of reporting span (span floored at one hour), scaled and capped.
pub fn velocity(count: usize, oldest: DateTime<Utc>, newest: DateTime<Utc>, cfg: &ClusterScoreConfig) -> u8 {
    let span_hours = hours_between(oldest, newest).max(1.0);
    clamp_score((count as f64 / span_hours * cfg.velocity_multiplier).round())
}

/// Distinct outlet domains times the per-domain step, capped at 100.
pub fn source_diversity(articles: &[Article], cfg: &ClusterScoreConfig) -> u8 {
    let unique: HashSet<&str> = articles.iter().map(|a| a.source.domain.as_str()).collect();
    let raw = unique.len().saturating_mul(usize::from(cfg.diversity_per_domain));
    raw.min(100) as u8
}

/// Mean validity over scored members only; zero means "not scored" and is skipped.
pub fn trust_aggregate(articles: &[Article], cfg: &ClusterScoreConfig) -> u8 {
    let scored: Vec<f64> = articles
        .iter()
        .filter(|a| a.validity_score > 0)
        .map(|a| f64::from(a.validity_score))
        .collect();
    if scored.is_empty() {
        return cfg.neutral_trust;
    }
    clamp_score((scored.iter().sum::<f64>() / scored.len() as f64).round())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::fixtures::{article, source};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn at(id: &str, domain: &str, t: DateTime<Utc>, validity: u8) -> Article {
        let mut a = article(id, "Storm hits coast", domain, &t.to_rfc3339());
        a.source = source(domain, 70);
        a.validity_score = validity;
        a
    }

    #[test]
    fn freshness_decays_four_points_per_hour() {
        let cfg = ClusterScoreConfig::default();
        assert_eq!(freshness(now(), now(), &cfg), 100);
        assert_eq!(freshness(now() - Duration::hours(10), now(), &cfg), 60);
        assert_eq!(freshness(now() - Duration::hours(25), now(), &cfg), 0);
        assert_eq!(freshness(now() - Duration::hours(200), now(), &cfg), 0);
        // future-dated items do not exceed 100
        assert_eq!(freshness(now() + Duration::hours(3), now(), &cfg), 100);
    }

    #[test]
    fn velocity_span_is_floored_at_one_hour() {
        let cfg = ClusterScoreConfig::default();
        assert_eq!(velocity(3, now(), now(), &cfg), 30);
        assert_eq!(velocity(4, now() - Duration::hours(2), now(), &cfg), 20);
        assert_eq!(velocity(50, now(), now(), &cfg), 100);
    }

    #[test]
    fn diversity_counts_unique_domains_capped() {
        let cfg = ClusterScoreConfig::default();
        let t = now();
        let three = vec![
            at("a", "apnews.com", t, 0),
            at("b", "bbc.com", t, 0),
            at("c", "bbc.com", t, 0),
            at("d", "npr.org", t, 0),
        ];
        assert_eq!(source_diversity(&three, &cfg), 60);
        let many: Vec<Article> = (0..7)
            .map(|i| at(&format!("a{i}"), &format!("site{i}.com"), t, 0))
            .collect();
        assert_eq!(source_diversity(&many, &cfg), 100);
    }

    #[test]
    fn trust_aggregate_skips_unscored() {
        let cfg = ClusterScoreConfig::default();
        let t = now();
        let mixed = vec![at("a", "x.com", t, 80), at("b", "y.com", t, 0), at("c", "z.com", t, 61)];
        assert_eq!(trust_aggregate(&mixed, &cfg), 71);
        let none = vec![at("a", "x.com", t, 0)];
        assert_eq!(trust_aggregate(&none, &cfg), 50);
    }

    #[test]
    fn combined_score_uses_cluster_weights() {
        let cfg = ClusterScoreConfig::default();
        let t = now();
        let members = vec![
            at("a", "apnews.com", t, 60),
            at("b", "bbc.com", t, 60),
            at("c", "npr.org", t, 60),
        ];
        let s = score_cluster(&members, t, &cfg);
        assert_eq!(s.freshness, 100);
        assert_eq!(s.velocity, 30);
        assert_eq!(s.source_diversity, 60);
        assert_eq!(s.trust_aggregate, 60);
        // 25 + 7.5 + 18 + 12 = 62.5 → 63
        assert_eq!(s.score, 63);
    }

    #[test]
    fn unparseable_dates_are_maximally_old() {
        let cfg = ClusterScoreConfig::default();
        let mut a = at("a", "x.com", now(), 0);
        a.published_at = "not a date".into();
        let s = score_cluster(&[a], now(), &cfg);
        assert_eq!(s.freshness, 0);
    }

    #[test]
    fn empty_cluster_scores_zero() {
        let s = score_cluster(&[], now(), &ClusterScoreConfig::default());
        assert_eq!(s, ClusterScores::default());
    }
}
