// src/trust_baseline.rs
//! Per-source trust baseline from cheap local signals.
//!
//! composite = base rating
//!           - sensationality penalty  (share of sensational headlines * 40, max 20)
//!           + evidence bonus          (share of evidence-citing headlines * 20, max 10)
//!           + corroboration bonus     (share of multi-source clusters featuring the source * 15, max 10)
//! clamped to [0, 100]. Each applied signal is listed for display.

use serde::Serialize;
use std::collections::HashSet;

use crate::article::{ArticleCluster, Source};

const SENSATIONAL_MARKERS: &[&str] = &[
    "bombshell", "shocking", "explosive", "stunning", "unbelievable", "you won't believe",
    "won't believe", "destroys", "obliterates", "annihilates", "slams", "blasts", "rips",
    "shreds", "torches", "nukes", "exposed", "exposes", "secret",
    "they don't want you to know", "mainstream media won't", "cover-up", "coverup", "scandal",
    "outrage", "outraged", "fury", "furious", "meltdown", "!!!", "must watch", "must read",
    "wake up",
];

const EVIDENCE_MARKERS: &[&str] = &[
    "study", "studies", "research", "researchers", "analysis", "report", "reports", "data",
    "statistics", "figures", "according to", "officials said", "officials say",
    "confirmed by", "peer-reviewed", "published in", "journal", "university", "institute",
    "survey", "poll", "documents show", "records show",
];

const SENSATIONAL_SCALE: f64 = 40.0;
const SENSATIONAL_CAP: f64 = 20.0;
const EVIDENCE_SCALE: f64 = 20.0;
const EVIDENCE_CAP: f64 = 10.0;
const CORROBORATION_SCALE: f64 = 15.0;
const CORROBORATION_CAP: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineBreakdown {
    pub base: u8,
    pub sensationality_penalty: u8,
    pub corroboration_bonus: u8,
    pub evidence_bonus: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    pub label: String,
    pub delta: i32,
    pub positive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustBaseline {
    pub source: Source,
    pub composite_score: u8,
    pub breakdown: BaselineBreakdown,
    pub signals: Vec<Signal>,
}

impl TrustBaseline {
    fn recompute(&mut self) {
        let b = self.breakdown;
        let raw = i32::from(b.base) - i32::from(b.sensationality_penalty)
            + i32::from(b.corroboration_bonus)
            + i32::from(b.evidence_bonus);
        self.composite_score = raw.clamp(0, 100) as u8;
    }
}

fn share_matching(headlines: &[String], markers: &[&str]) -> (usize, f64) {
    if headlines.is_empty() {
        return (0, 0.0);
    }
    let hits = headlines
        .iter()
        .filter(|h| markers.iter().any(|m| h.contains(m)))
        .count();
    (hits, hits as f64 / headlines.len() as f64)
}

/// Baseline for `source` from a sample of its recent headlines (may be empty).
pub fn compute_trust_baseline(source: &Source, recent_headlines: &[&str]) -> TrustBaseline {
    let base = source.factual_rating.min(100);
    let lowered: Vec<String> = recent_headlines.iter().map(|h| h.to_lowercase()).collect();
    let total = lowered.len();

    let (sens_hits, sens_rate) = share_matching(&lowered, SENSATIONAL_MARKERS);
    let sensationality_penalty = (sens_rate * SENSATIONAL_SCALE).min(SENSATIONAL_CAP).round() as u8;

    let (ev_hits, ev_rate) = share_matching(&lowered, EVIDENCE_MARKERS);
    let evidence_bonus = (ev_rate * EVIDENCE_SCALE).min(EVIDENCE_CAP).round() as u8;

    let mut signals = vec![Signal {
        label: format!("Base factual rating ({})", source.name),
        delta: i32::from(base),
        positive: true,
    }];
    if sensationality_penalty > 0 {
        signals.push(Signal {
            label: format!("Sensational language in {sens_hits} of {total} headlines"),
            delta: -i32::from(sensationality_penalty),
            positive: false,
        });
    }
    if evidence_bonus > 0 {
        signals.push(Signal {
            label: format!("Evidence cited in {ev_hits} of {total} headlines"),
            delta: i32::from(evidence_bonus),
            positive: true,
        });
    }

    let mut out = TrustBaseline {
        source: source.clone(),
        composite_score: 0,
        breakdown: BaselineBreakdown {
            base,
            sensationality_penalty,
            corroboration_bonus: 0,
            evidence_bonus,
        },
        signals,
    };
    out.recompute();
    out
}

/// Add the corroboration bonus once cluster data is available.
pub fn apply_corroboration_bonus(
    mut baseline: TrustBaseline,
    cluster_appearances: usize,
    total_clusters: usize,
) -> TrustBaseline {
    let rate = if total_clusters > 0 {
        cluster_appearances as f64 / total_clusters as f64
    } else {
        0.0
    };
    let bonus = (rate * CORROBORATION_SCALE).min(CORROBORATION_CAP).round() as u8;
    baseline.breakdown.corroboration_bonus = bonus;
    baseline.recompute();
    if bonus > 0 {
        baseline.signals.push(Signal {
            label: format!(
                "Corroborated in {cluster_appearances} of {total_clusters} multi-source clusters"
            ),
            delta: i32::from(bonus),
            positive: true,
        });
    }
    baseline
}

/// (clusters with 2+ outlets that include `domain`, clusters with 2+ outlets).
pub fn multi_source_appearances(clusters: &[ArticleCluster], domain: &str) -> (usize, usize) {
    let multi: Vec<&ArticleCluster> = clusters.iter().filter(|c| c.sources.len() > 1).collect();
    let hits = multi
        .iter()
        .filter(|c| c.sources.iter().any(|s| s.domain == domain))
        .count();
    (hits, multi.len())
}

/// Baselines for every outlet in a ranked batch, using that batch's headlines and
/// cluster structure. Outlets appear in first-seen order.
pub fn baselines_for_batch(clusters: &[ArticleCluster]) -> Vec<TrustBaseline> {
    let mut seen = HashSet::new();
    let mut outlets: Vec<&Source> = Vec::new();
    for c in clusters {
        for a in &c.articles {
            if seen.insert(a.source.domain.as_str()) {
                outlets.push(&a.source);
            }
        }
    }

    outlets
        .into_iter()
        .map(|src| {
            let headlines: Vec<&str> = clusters
                .iter()
                .flat_map(|c| c.articles.iter())
                .filter(|a| a.source.domain == src.domain)
                .map(|a| a.title.as_str())
                .collect();
            let base = compute_trust_baseline(src, &headlines);
            let (hits, total) = multi_source_appearances(clusters, &src.domain);
            apply_corroboration_bonus(base, hits, total)
        })
        .collect()
}
