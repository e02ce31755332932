// src/recap.rs
//! 24-hour recap built from an already-ranked cluster batch (no extra fetching).

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::article::ArticleCluster;

const RECAP_WINDOW_HOURS: i64 = 24;
const RECAP_MAX_ITEMS: usize = 6;
const EMPTY_TOPIC: &str = "No stories loaded";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecapItem {
    pub cluster_id: String,
    pub topic: String,
    pub article_count: usize,
    pub trust_score: u8,
    pub top_headline: String,
    pub source_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecapSummary {
    pub items: Vec<RecapItem>,
    pub total_articles: usize,
    pub avg_trust: u8,
    pub top_topic: String,
    pub generated_at: DateTime<Utc>,
}

/// Top clusters active within the last 24 h of `now`, by score.
/// Totals and average trust cover every cluster passed in.
pub fn build_recap(clusters: &[ArticleCluster], now: DateTime<Utc>) -> RecapSummary {
    let cutoff = now - Duration::hours(RECAP_WINDOW_HOURS);

    let mut recent: Vec<&ArticleCluster> =
        clusters.iter().filter(|c| c.last_updated > cutoff).collect();
    recent.sort_by(|a, b| b.score.cmp(&a.score));

    let items: Vec<RecapItem> = recent
        .into_iter()
        .take(RECAP_MAX_ITEMS)
        .map(|c| {
            let top = c.articles.first();
            RecapItem {
                cluster_id: c.id.clone(),
                topic: c.topic.clone(),
                article_count: c.article_count,
                trust_score: c.trust_aggregate,
                top_headline: top.map(|a| a.title.clone()).unwrap_or_else(|| c.topic.clone()),
                source_name: top
                    .map(|a| a.source.name.clone())
                    .unwrap_or_else(|| "Multiple Sources".to_string()),
            }
        })
        .collect();

    let total_articles = clusters.iter().map(|c| c.article_count).sum();
    let avg_trust = if clusters.is_empty() {
        0
    } else {
        let sum: f64 = clusters.iter().map(|c| f64::from(c.trust_aggregate)).sum();
        (sum / clusters.len() as f64).round() as u8
    };
    let top_topic = items
        .first()
        .map(|i| i.topic.clone())
        .unwrap_or_else(|| EMPTY_TOPIC.to_string());

    RecapSummary {
        items,
        total_articles,
        avg_trust,
        top_topic,
        generated_at: now,
    }
}
