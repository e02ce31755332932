// src/category.rs
//! Coarse story categories from keyword substrings.
//!
//! A cluster is tagged from its topic label plus its first few headlines. Matching is
//! case-insensitive `contains`, so short keywords also hit inside longer words
//! ("war" in "warning"). A story may carry several categories or none.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::article::ArticleCluster;

/// Headlines beyond this many are not searched.
pub const HEADLINES_SEARCHED: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Politics,
    Military,
    Sports,
    Environment,
    #[serde(rename = "Science & Tech")]
    ScienceTech,
    Economy,
}

impl Category {
    /// Every category, in the order detection reports them.
    pub const ALL: [Category; 6] = [
        Category::Politics,
        Category::Military,
        Category::Sports,
        Category::Environment,
        Category::ScienceTech,
        Category::Economy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Politics => "Politics",
            Category::Military => "Military",
            Category::Sports => "Sports",
            Category::Environment => "Environment",
            Category::ScienceTech => "Science & Tech",
            Category::Economy => "Economy",
        }
    }

    /// Lowercase keyword table. Leading/trailing spaces are significant.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::Politics => &[
                "election", "president", "senate", "congress", "parliament", "government",
                "minister", "vote", "voting", "policy", "democrat", "republican", "trump",
                "biden", "harris", "political", "legislation", "law", "administration",
                "campaign", "diplomat", "diplomacy", "treaty", "white house", "prime minister",
                "chancellor", "sanctions", "tariff", "immigration", "border", "constitution",
                "supreme court", "judiciary",
            ],
            Category::Military => &[
                "war", "military", "army", "navy", "troops", "soldier", "missile", "weapon",
                "attack", "conflict", "battle", "nato", "defense", "defence", "strike", "bomb",
                "nuclear", "drone", "combat", "invasion", "ceasefire", "artillery", "tank",
                "air force", "fighter jet", "warship", "pentagon", "ukraine", "russia", "hamas",
                "hezbollah", "isis", "terror", "hostage", "airstrike", "siege", "blockade",
                "guerrilla", "insurgent",
            ],
            Category::Sports => &[
                "sport", "football", "soccer", "basketball", "tennis", "cricket", "olympics",
                "championship", "tournament", "medal", "athlete", "nfl", "nba", "fifa",
                "premier league", "formula 1", "grand prix", "golf", "rugby", "baseball",
                "hockey", "swimming", "cycling", "stadium", "referee", "boxing", "ufc", "mma",
                "snooker", "darts", "wicket", "touchdown", "hat trick", "knockout", "bout",
                "golfer", "footballer", "cricketer", "wimbledon", "open championship",
            ],
            Category::Environment => &[
                "climate", "environment", "carbon", "emission", "weather", "flood", "wildfire",
                "drought", "ocean", "wildlife", "species", "pollution", "renewable", "solar",
                "wind energy", "forest", "glacier", "coral", "deforestation", "biodiversity",
                "extinction", "plastic", "recycling", "fossil fuel", "net zero", "cop",
                "greenhouse", "methane", "ozone", "hurricane", "tornado", "earthquake",
                "tsunami", "natural disaster",
            ],
            Category::ScienceTech => &[
                "science", "technology", "artificial intelligence", "ai ", " ai",
                "machine learning", "space", "nasa", "research", "study", "discovery", "robot",
                "quantum", "gene", "medical", "health", "drug", "vaccine", "tech", "digital",
                "cyber", "hack", "data", "privacy", "apple", "google", "microsoft", "meta",
                "openai", "chip", "semiconductor", "cancer", "virus", "pandemic", "physics",
                "astronomy", "telescope", "mars", "rocket", "launch", "satellite", "dna",
                "crispr",
            ],
            Category::Economy => &[
                "economy", "economic", "gdp", "inflation", "interest rate", "federal reserve",
                "stock", "market", "nasdaq", "s&p", "dow jones", "shares", "earnings",
                "recession", "unemployment", "jobs report", "trade", "tariff", "deficit", "debt",
                "budget", "spending", "treasury", "bank", "banking", "mortgage",
                "housing market", "consumer", "retail", "oil price", "energy price", "crypto",
                "bitcoin", "dollar", "currency", "imf", "world bank", "supply chain",
                "manufacturing", "exports", "imports", "fiscal",
            ],
        }
    }

    fn matches(self, lowered: &str) -> bool {
        self.keywords().iter().any(|kw| lowered.contains(kw))
    }
}

/// Categories whose keywords occur in `text`, in `Category::ALL` order.
pub fn detect_categories(text: &str) -> Vec<Category> {
    let lowered = text.to_lowercase();
    Category::ALL
        .into_iter()
        .filter(|c| c.matches(&lowered))
        .collect()
}

/// Topic plus the first `HEADLINES_SEARCHED` titles, space-joined.
pub fn cluster_search_text<'a, I>(topic: &str, titles: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut text = topic.to_string();
    for title in titles.into_iter().take(HEADLINES_SEARCHED) {
        text.push(' ');
        text.push_str(title);
    }
    text
}

/// An empty selection matches every cluster.
pub fn cluster_matches(cluster: &ArticleCluster, selected: &HashSet<Category>) -> bool {
    if selected.is_empty() {
        return true;
    }
    let text = cluster_search_text(&cluster.topic, cluster.articles.iter().map(|a| a.title.as_str()));
    detect_categories(&text)
        .into_iter()
        .any(|c| selected.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::fixtures::article;
    use chrono::{TimeZone, Utc};

    fn cluster(topic: &str, titles: &[&str]) -> ArticleCluster {
        let t = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let articles: Vec<_> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| article(&format!("a{i}"), title, "apnews.com", &t.to_rfc3339()))
            .collect();
        ArticleCluster {
            id: "cluster-x-0".into(),
            topic: topic.into(),
            sources: vec![articles[0].source.clone()],
            article_count: articles.len(),
            articles,
            avg_validity: 50,
            freshness: 0,
            velocity: 0,
            source_diversity: 20,
            trust_aggregate: 50,
            score: 30,
            first_seen: t,
            last_updated: t,
            categories: Vec::new(),
        }
    }

    #[test]
    fn detects_several_categories_in_table_order() {
        let cats = detect_categories("Tariff fight rattles stock market as Senate votes");
        assert_eq!(cats, vec![Category::Politics, Category::Economy]);
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(detect_categories("WIMBLEDON FINAL"), vec![Category::Sports]);
        assert_eq!(detect_categories("NASA lander reaches orbit"), vec![Category::ScienceTech]);
    }

    #[test]
    fn unrelated_text_has_no_category() {
        assert!(detect_categories("Zoo welcomes twin pandas").is_empty());
        assert!(detect_categories("").is_empty());
    }

    #[test]
    fn keywords_match_inside_words() {
        // "war" inside "warning"
        assert!(detect_categories("Tsunami warning issued").contains(&Category::Military));
    }

    #[test]
    fn serde_uses_display_names() {
        let v = serde_json::to_value(Category::ScienceTech).unwrap();
        assert_eq!(v, serde_json::json!("Science & Tech"));
        let back: Category = serde_json::from_str("\"Economy\"").unwrap();
        assert_eq!(back, Category::Economy);
        assert_eq!(Category::ScienceTech.label(), "Science & Tech");
    }

    #[test]
    fn empty_selection_matches_everything() {
        let c = cluster("ZOO · PANDAS", &["Zoo welcomes twin pandas"]);
        assert!(cluster_matches(&c, &HashSet::new()));
    }

    #[test]
    fn selection_must_intersect_detected_categories() {
        let c = cluster("WILDFIRE · CALIFORNIA", &["Wildfire forces evacuations"]);
        let env: HashSet<_> = [Category::Environment].into_iter().collect();
        let sport: HashSet<_> = [Category::Sports, Category::Economy].into_iter().collect();
        assert!(cluster_matches(&c, &env));
        assert!(!cluster_matches(&c, &sport));
    }

    #[test]
    fn only_first_headlines_are_searched() {
        let mut titles = vec!["Zoo welcomes twin pandas"; HEADLINES_SEARCHED];
        titles.push("Pandas star at football match");
        let c = cluster("ZOO · PANDAS", &titles);
        let sport: HashSet<_> = [Category::Sports].into_iter().collect();
        assert!(!cluster_matches(&c, &sport));

        let text = cluster_search_text("T", ["a", "b", "c", "d", "e", "f"]);
        assert_eq!(text, "T a b c d e");
    }
}
