// src/scoring/validity.rs
//! Per-article validity score (0-100).
//!
//! overall = corroboration*0.40 + source_reliability*0.30 + fact_check*0.20 + consistency*0.10
//!
//! - corroboration: step function of distinct sibling domains (own domain excluded)
//! - source_reliability: effective factual rating of the article's outlet
//! - fact_check: mean verdict score, neutral when there is no evidence
//! - consistency: tone agreement among siblings (population variance of sentiment)

use std::collections::HashSet;

use crate::article::{Article, BreakdownEntry, ScoringResult};
use crate::config::ValidityConfig;
use crate::overrides::TrustOverride;
use crate::scoring::factcheck::{fact_check_score, FactCheckResult};

pub const LABEL_CORROBORATION: &str = "Corroboration";
pub const LABEL_SOURCE_RELIABILITY: &str = "Source Reliability";
pub const LABEL_FACT_CHECK: &str = "Fact Check";
pub const LABEL_CONSISTENCY: &str = "Consistency";

/// Scorer bound to one config and one trust override for a batch.
pub struct ValidityScorer<'a> {
    cfg: &'a ValidityConfig,
    overrides: &'a dyn TrustOverride,
}

impl<'a> ValidityScorer<'a> {
    pub fn new(cfg: &'a ValidityConfig, overrides: &'a dyn TrustOverride) -> Self {
        Self { cfg, overrides }
    }

    /// Score `article` given its cluster siblings (the article itself excluded) and
    /// optional fact-check evidence (empty = no data).
    pub fn score(
        &self,
        article: &Article,
        siblings: &[&Article],
        evidence: &[FactCheckResult],
    ) -> ScoringResult {
        let cfg = self.cfg;
        let w = cfg.weights;

        let corroboration = self.corroboration(article, siblings);
        let source_reliability = self
            .overrides
            .effective_rating(article.source.factual_rating, &article.source.domain)
            .min(100);
        let fact_check = fact_check_score(evidence, cfg.neutral_fact_check).min(100);
        let consistency = self.consistency(siblings);

        let weighted = f64::from(corroboration) * w.corroboration
            + f64::from(source_reliability) * w.source_reliability
            + f64::from(fact_check) * w.fact_check
            + f64::from(consistency) * w.consistency;
        let overall = clamp_score(weighted.round());

        ScoringResult {
            overall,
            corroboration,
            source_reliability,
            fact_check,
            consistency,
            breakdown: vec![
                entry(LABEL_CORROBORATION, corroboration, w.corroboration),
                entry(LABEL_SOURCE_RELIABILITY, source_reliability, w.source_reliability),
                entry(LABEL_FACT_CHECK, fact_check, w.fact_check),
                entry(LABEL_CONSISTENCY, consistency, w.consistency),
            ],
        }
    }

    /// Step function of unique sibling domains, not counting the article's own outlet.
    pub fn corroboration(&self, article: &Article, siblings: &[&Article]) -> u8 {
        let own = article.source.domain.as_str();
        let unique: HashSet<&str> = siblings
            .iter()
            .map(|a| a.source.domain.as_str())
            .filter(|d| *d != own)
            .collect();
        corroboration_for(unique.len(), self.cfg)
    }

    /// Agreement of sibling tone. Fewer than two siblings is not enough signal.
    pub fn consistency(&self, siblings: &[&Article]) -> u8 {
        if siblings.len() < 2 {
            return self.cfg.neutral_consistency;
        }
        let sentiments: Vec<f64> = siblings.iter().map(|a| clamp_sentiment(a.sentiment)).collect();
        let n = sentiments.len() as f64;
        let mean = sentiments.iter().sum::<f64>() / n;
        let variance = sentiments.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

        let raw = (100.0 - variance * self.cfg.consistency_variance_penalty).round();
        clamp_score(raw.max(f64::from(self.cfg.consistency_floor)))
    }
}

/// Score for `count` unique corroborating domains.
pub fn corroboration_for(count: usize, cfg: &ValidityConfig) -> u8 {
    cfg.corroboration_steps
        .iter()
        .find(|step| count <= step.max_domains)
        .map(|step| step.score)
        .unwrap_or(cfg.corroboration_ceiling)
        .min(100)
}

fn entry(label: &str, score: u8, weight: f64) -> BreakdownEntry {
    BreakdownEntry {
        label: label.to_string(),
        score,
        weight,
    }
}

/// Sentiment outside [-1, 1] (or NaN) is pulled back into range.
fn clamp_sentiment(s: f64) -> f64 {
    if s.is_nan() {
        0.0
    } else {
        s.clamp(-1.0, 1.0)
    }
}

pub(crate) fn clamp_score(x: f64) -> u8 {
    if x.is_nan() {
        0
    } else {
        x.clamp(0.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::fixtures::{article, source};
    use crate::overrides::{OverrideMode, OverrideTable, SourceOverride};
    use crate::scoring::factcheck::Verdict;

    const TS: &str = "2025-03-01T10:00:00Z";

    fn with_domain(id: &str, domain: &str, rating: u8, sentiment: f64) -> Article {
        let mut a = article(id, "Storm hits coast", domain, TS);
        a.source = source(domain, rating);
        a.sentiment = sentiment;
        a
    }

    #[test]
    fn corroboration_steps() {
        let cfg = ValidityConfig::default();
        let expected = [
            (0, 5),
            (1, 15),
            (2, 30),
            (3, 50),
            (4, 50),
            (5, 70),
            (7, 70),
            (8, 85),
            (11, 85),
            (12, 95),
            (40, 95),
        ];
        for (count, score) in expected {
            assert_eq!(corroboration_for(count, &cfg), score, "count {count}");
        }
        // non-decreasing
        let seq: Vec<u8> = (0..20).map(|c| corroboration_for(c, &cfg)).collect();
        assert!(seq.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn own_domain_and_repeats_do_not_corroborate() {
        let cfg = ValidityConfig::default();
        let scorer = ValidityScorer::new(&cfg, &crate::overrides::NoOverride);
        let a = with_domain("a", "apnews.com", 90, 0.0);
        let s1 = with_domain("b", "apnews.com", 90, 0.0);
        let s2 = with_domain("c", "bbc.com", 90, 0.0);
        let s3 = with_domain("d", "bbc.com", 90, 0.0);
        assert_eq!(scorer.corroboration(&a, &[&s1, &s2, &s3]), 15);
    }

    #[test]
    fn lone_article_is_neutral_on_fact_check_and_consistency() {
        let cfg = ValidityConfig::default();
        let scorer = ValidityScorer::new(&cfg, &crate::overrides::NoOverride);
        let a = with_domain("a", "reuters.com", 80, 0.0);
        let r = scorer.score(&a, &[], &[]);
        assert_eq!(r.corroboration, 5);
        assert_eq!(r.fact_check, 50);
        assert_eq!(r.consistency, 50);
        assert_eq!(r.source_reliability, 80);
        // 5*.4 + 80*.3 + 50*.2 + 50*.1 = 41
        assert_eq!(r.overall, 41);
    }

    #[test]
    fn breakdown_is_labelled_and_weights_sum_to_one() {
        let cfg = ValidityConfig::default();
        let scorer = ValidityScorer::new(&cfg, &crate::overrides::NoOverride);
        let a = with_domain("a", "reuters.com", 80, 0.0);
        let r = scorer.score(&a, &[], &[]);
        let labels: Vec<&str> = r.breakdown.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Corroboration", "Source Reliability", "Fact Check", "Consistency"]
        );
        let total: f64 = r.breakdown.iter().map(|b| b.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(r.breakdown[1].score, r.source_reliability);
    }

    #[test]
    fn consistency_uses_population_variance_with_floor() {
        let cfg = ValidityConfig::default();
        let scorer = ValidityScorer::new(&cfg, &crate::overrides::NoOverride);

        let agree = [with_domain("b", "x.com", 50, 0.4), with_domain("c", "y.com", 50, 0.4)];
        assert_eq!(scorer.consistency(&[&agree[0], &agree[1]]), 100);

        // ±0.9 → variance 0.81 → 100 - 64.8 = 35
        let split = [with_domain("b", "x.com", 50, 0.9), with_domain("c", "y.com", 50, -0.9)];
        assert_eq!(scorer.consistency(&[&split[0], &split[1]]), 35);

        // ±1.0 saturates the penalty at the floor.
        let extreme = [with_domain("b", "x.com", 50, 1.0), with_domain("c", "y.com", 50, -1.0)];
        assert_eq!(scorer.consistency(&[&extreme[0], &extreme[1]]), 20);

        // Out-of-range sentiment is clamped first, so it can never go below the floor.
        let wild = [with_domain("b", "x.com", 50, 7.0), with_domain("c", "y.com", 50, -7.0)];
        assert_eq!(scorer.consistency(&[&wild[0], &wild[1]]), 20);

        let one = with_domain("b", "x.com", 50, 0.9);
        assert_eq!(scorer.consistency(&[&one]), 50);
    }

    #[test]
    fn fact_check_evidence_moves_the_score() {
        let cfg = ValidityConfig::default();
        let scorer = ValidityScorer::new(&cfg, &crate::overrides::NoOverride);
        let a = with_domain("a", "reuters.com", 80, 0.0);
        let ev = vec![FactCheckResult {
            claim: "c".into(),
            rating: Verdict::False,
            source: "Snopes".into(),
            url: String::new(),
        }];
        let r = scorer.score(&a, &[], &ev);
        assert_eq!(r.fact_check, 0);
        // 2 + 24 + 0 + 5
        assert_eq!(r.overall, 31);
    }

    #[test]
    fn override_feeds_source_reliability() {
        let cfg = ValidityConfig::default();
        let mut table = OverrideTable::new();
        table.insert(
            "reuters.com",
            SourceOverride {
                mode: OverrideMode::Abs,
                value: 20,
                note: None,
            },
        );
        let scorer = ValidityScorer::new(&cfg, &table);
        let a = with_domain("a", "reuters.com", 80, 0.0);
        let r = scorer.score(&a, &[], &[]);
        assert_eq!(r.source_reliability, 20);
        // source record is untouched
        assert_eq!(a.source.factual_rating, 80);
    }

    #[test]
    fn overall_stays_in_range() {
        let cfg = ValidityConfig::default();
        let scorer = ValidityScorer::new(&cfg, &crate::overrides::NoOverride);
        let a = with_domain("a", "reuters.com", 255, 0.0);
        let r = scorer.score(&a, &[], &[]);
        assert!(r.overall <= 100);
        assert_eq!(r.source_reliability, 100);
    }
}
