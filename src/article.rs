// src/article.rs
//! Data model shared with the ingestion and presentation collaborators.
//!
//! Wire shape is camelCase JSON. Scores are integers in `[0, 100]`; weights are `f64`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::category::Category;
use crate::error::{EngineError, Result};

/// Political leaning of an outlet (ordinal, five buckets).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bias {
    Left,
    LeftCenter,
    #[default]
    Center,
    RightCenter,
    Right,
}

/// A reporting outlet. `domain` is the only identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: String,
    pub name: String,
    pub domain: String,
    #[serde(default)]
    pub bias: Bias,
    pub factual_rating: u8,
}

impl Source {
    /// Neutral stand-in for a domain the rating registry does not know.
    pub fn neutral(domain: &str) -> Self {
        Self {
            id: format!("unknown-{domain}"),
            name: domain.to_string(),
            domain: domain.to_string(),
            bias: Bias::Center,
            factual_rating: 50,
        }
    }
}

/// One labelled row of the "why this score" display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub score: u8,
    pub weight: f64,
}

/// Per-article validity result. Always recomputable from the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    pub overall: u8,
    pub corroboration: u8,
    pub source_reliability: u8,
    pub fact_check: u8,
    pub consistency: u8,
    pub breakdown: Vec<BreakdownEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub url: String,
    pub source: Source,
    /// Raw timestamp as ingested (RFC 3339, or RFC 2822 as found in RSS `pubDate`).
    pub published_at: String,
    #[serde(default)]
    pub summary: String,
    /// `[-1, 1]`; 0 until scored.
    #[serde(default)]
    pub sentiment: f64,
    /// 0 means "not yet scored".
    #[serde(default)]
    pub validity_score: u8,
    #[serde(default)]
    pub corroboration_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_breakdown: Option<ScoringResult>,
}

impl Article {
    /// Parsed publication time. Unparseable timestamps read as the Unix epoch,
    /// i.e. maximally old, so they sink in freshness instead of failing the batch.
    pub fn published(&self) -> DateTime<Utc> {
        parse_timestamp(&self.published_at).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Text the tokenizer sees: title followed by summary.
    pub fn text(&self) -> String {
        if self.summary.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.title, self.summary)
        }
    }

    /// Check the hard preconditions (non-empty id, title, source domain, publishedAt).
    pub fn validate(&self, index: usize) -> Result<()> {
        let missing = |field| EngineError::MissingField { index, field };
        if self.id.trim().is_empty() {
            return Err(missing("id"));
        }
        if self.title.trim().is_empty() {
            return Err(missing("title"));
        }
        if self.source.domain.trim().is_empty() {
            return Err(missing("source.domain"));
        }
        if self.published_at.trim().is_empty() {
            return Err(missing("publishedAt"));
        }
        Ok(())
    }
}

/// Validate a whole batch; fails on the first malformed article or repeated id.
pub fn validate_batch(articles: &[Article]) -> Result<()> {
    let mut seen = HashSet::with_capacity(articles.len());
    for (i, a) in articles.iter().enumerate() {
        a.validate(i)?;
        if !seen.insert(a.id.as_str()) {
            return Err(EngineError::DuplicateId { id: a.id.clone() });
        }
    }
    Ok(())
}

/// Accepts RFC 3339 first, then RFC 2822.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// A topic cluster. Built fresh per batch and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleCluster {
    pub id: String,
    pub topic: String,
    /// Discovery order (seed first), not re-sorted.
    pub articles: Vec<Article>,
    pub article_count: usize,
    /// Same value as `trust_aggregate`; kept for older presentation code.
    pub avg_validity: u8,
    /// Deduplicated by domain, first-seen order.
    pub sources: Vec<Source>,
    pub freshness: u8,
    pub velocity: u8,
    pub source_diversity: u8,
    pub trust_aggregate: u8,
    pub score: u8,
    pub first_seen: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    /// Detected from the topic and the first few headlines; may be empty.
    #[serde(default)]
    pub categories: Vec<Category>,
}
