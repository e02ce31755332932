// src/config.rs
//! Engine tunables, loaded from TOML.
//!
//! Every constant of the clustering and scoring math lives here under a name:
//! clustering threshold, keyword count, validity weights and corroboration steps,
//! consistency penalty, freshness decay, velocity multiplier, diversity step and
//! cluster weights. Defaults reproduce the production behaviour exactly.
//!
//! Resolution order:
//! 1) `$VERITAS_CONFIG_PATH` (must exist)
//! 2) `config/engine.toml`
//! 3) built-in defaults
//!
//! `$VERITAS_CLUSTER_THRESHOLD` overrides the clustering threshold (clamped to `[0, 1]`).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{EngineError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config/engine.toml";
pub const ENV_CONFIG_PATH: &str = "VERITAS_CONFIG_PATH";
pub const ENV_CLUSTER_THRESHOLD: &str = "VERITAS_CLUSTER_THRESHOLD";

pub const DEFAULT_CLUSTER_THRESHOLD: f64 = 0.15;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub clustering: ClusteringConfig,
    pub validity: ValidityConfig,
    pub cluster: ClusterScoreConfig,
    /// Lexicon-score articles whose sentiment is still 0 before consistency scoring.
    pub fill_sentiment: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clustering: ClusteringConfig::default(),
            validity: ValidityConfig::default(),
            cluster: ClusterScoreConfig::default(),
            fill_sentiment: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Minimum cosine similarity to the seed for a document to join its cluster.
    pub threshold: f64,
    /// Keywords in a topic label.
    pub keyword_count: usize,
    pub label_separator: String,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CLUSTER_THRESHOLD,
            keyword_count: 3,
            label_separator: " · ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidityWeights {
    pub corroboration: f64,
    pub source_reliability: f64,
    pub fact_check: f64,
    pub consistency: f64,
}

impl ValidityWeights {
    pub fn sum(&self) -> f64 {
        self.corroboration + self.source_reliability + self.fact_check + self.consistency
    }
}

impl Default for ValidityWeights {
    fn default() -> Self {
        Self {
            corroboration: 0.40,
            source_reliability: 0.30,
            fact_check: 0.20,
            consistency: 0.10,
        }
    }
}

/// `score` applies while the unique sibling-domain count is `<= max_domains`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorroborationStep {
    pub max_domains: usize,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidityConfig {
    pub weights: ValidityWeights,
    /// Ascending by `max_domains`.
    pub corroboration_steps: Vec<CorroborationStep>,
    /// Score once the count exceeds the last step.
    pub corroboration_ceiling: u8,
    pub neutral_fact_check: u8,
    pub neutral_consistency: u8,
    pub consistency_variance_penalty: f64,
    pub consistency_floor: u8,
}

impl Default for ValidityConfig {
    fn default() -> Self {
        let steps = [(0, 5), (1, 15), (2, 30), (4, 50), (7, 70), (11, 85)]
            .into_iter()
            .map(|(max_domains, score)| CorroborationStep { max_domains, score })
            .collect();
        Self {
            weights: ValidityWeights::default(),
            corroboration_steps: steps,
            corroboration_ceiling: 95,
            neutral_fact_check: 50,
            neutral_consistency: 50,
            consistency_variance_penalty: 80.0,
            consistency_floor: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterWeights {
    pub freshness: f64,
    pub velocity: f64,
    pub source_diversity: f64,
    pub trust_aggregate: f64,
}

impl ClusterWeights {
    pub fn sum(&self) -> f64 {
        self.freshness + self.velocity + self.source_diversity + self.trust_aggregate
    }
}

impl Default for ClusterWeights {
    fn default() -> Self {
        Self {
            freshness: 0.25,
            velocity: 0.25,
            source_diversity: 0.30,
            trust_aggregate: 0.20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterScoreConfig {
    pub weights: ClusterWeights,
    /// Freshness points lost per hour of age of the newest member.
    pub freshness_decay_per_hour: f64,
    pub velocity_multiplier: f64,
    pub diversity_per_domain: u8,
    /// Trust aggregate when no member has been scored.
    pub neutral_trust: u8,
}

impl Default for ClusterScoreConfig {
    fn default() -> Self {
        Self {
            weights: ClusterWeights::default(),
            freshness_decay_per_hour: 4.0,
            velocity_multiplier: 10.0,
            diversity_per_domain: 20,
            neutral_trust: 50,
        }
    }
}

impl EngineConfig {
    /// Load using env var + fallbacks (see module docs).
    pub fn from_env() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let path = PathBuf::from(p);
                if !path.exists() {
                    return Err(EngineError::Config(format!(
                        "{ENV_CONFIG_PATH} points to non-existent path {}",
                        path.display()
                    )));
                }
                Self::from_path(&path)?
            }
            Err(_) => {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::from_path(&path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(t) = parse_threshold_env(std::env::var(ENV_CLUSTER_THRESHOLD).ok()) {
            cfg.clustering.threshold = t;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let cfg = Self::from_toml_str(&content)?;
        info!(target: "veritas", path = %path.display(), "engine config loaded");
        Ok(cfg)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Weight tables must sum to 1.0, steps must ascend, threshold must be finite.
    pub fn validate(&self) -> Result<()> {
        let t = self.clustering.threshold;
        if !t.is_finite() || !(0.0..=1.0).contains(&t) {
            return Err(EngineError::Config(format!(
                "clustering.threshold must be within [0, 1], got {t}"
            )));
        }
        let vs = self.validity.weights.sum();
        if (vs - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineError::Config(format!(
                "validity weights must sum to 1.0, got {vs}"
            )));
        }
        let cs = self.cluster.weights.sum();
        if (cs - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineError::Config(format!(
                "cluster weights must sum to 1.0, got {cs}"
            )));
        }
        let ascending = self
            .validity
            .corroboration_steps
            .windows(2)
            .all(|w| w[0].max_domains < w[1].max_domains);
        if !ascending {
            return Err(EngineError::Config(
                "validity.corroboration_steps must be strictly ascending by max_domains".into(),
            ));
        }
        Ok(())
    }
}

// parse optional float env and clamp to <0.0..=1.0>
fn parse_threshold_env(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
}
