//! # Source Registry
//!
//! Static mapping from outlet domain to its rated [`Source`] record
//! (name, political bias, factual rating 0-100).
//!
//! - Loads from a JSON list of sources, falling back to `default_seed()`.
//! - Domains are normalized: trimmed, lowercased, leading `www.` stripped.
//! - Unknown domains resolve to a neutral synthetic source (rating 50, CENTER)
//!   instead of failing.
//!
//! Seed ratings follow public media reliability assessments.

use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};
use tracing::warn;

use crate::article::{Bias, Source};

pub const DEFAULT_SOURCES_PATH: &str = "config/sources.json";
pub const ENV_SOURCES_PATH: &str = "VERITAS_SOURCES_PATH";

#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Source>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    sources: Vec<Source>,
}

impl SourceRegistry {
    pub fn from_sources(list: impl IntoIterator<Item = Source>) -> Self {
        let mut sources = HashMap::new();
        for mut s in list {
            s.domain = normalize_domain(&s.domain);
            s.factual_rating = s.factual_rating.min(100);
            sources.insert(s.domain.clone(), s);
        }
        Self { sources }
    }

    /// Parse `{ "sources": [ ... ] }`.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        let file: RegistryFile = serde_json::from_str(s)?;
        Ok(Self::from_sources(file.sources))
    }

    /// Load from a JSON file.
    /// Falls back to `default_seed()` on error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(s) => Self::from_json_str(&s).unwrap_or_else(|e| {
                warn!(target: "veritas", path = %path.display(), error = %e, "bad sources file, using built-in seed");
                Self::default_seed()
            }),
            Err(_) => Self::default_seed(),
        }
    }

    /// `$VERITAS_SOURCES_PATH`, else `config/sources.json`, else the seed.
    pub fn from_env() -> Self {
        let path =
            std::env::var(ENV_SOURCES_PATH).unwrap_or_else(|_| DEFAULT_SOURCES_PATH.to_string());
        Self::load_from_file(path)
    }

    pub fn lookup(&self, domain: &str) -> Option<&Source> {
        self.sources.get(&normalize_domain(domain))
    }

    /// Registry entry, or a neutral stand-in for unknown domains.
    pub fn resolve(&self, domain: &str) -> Source {
        let d = normalize_domain(domain);
        match self.sources.get(&d) {
            Some(s) => s.clone(),
            None => Source::neutral(&d),
        }
    }

    /// All sources, most reliable first (ties by domain).
    pub fn sources_by_reliability(&self) -> Vec<Source> {
        let mut out: Vec<Source> = self.sources.values().cloned().collect();
        out.sort_by(|a, b| {
            b.factual_rating
                .cmp(&a.factual_rating)
                .then_with(|| a.domain.cmp(&b.domain))
        });
        out
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Built-in seed covering the default feed list.
    pub fn default_seed() -> Self {
        use Bias::*;
        let seed = [
            ("ap", "Associated Press", "apnews.com", Center, 96),
            ("reuters", "Reuters", "reuters.com", Center, 95),
            ("bbc", "BBC News", "bbc.com", LeftCenter, 90),
            // BBC links often resolve to bbc.co.uk; same outlet.
            ("bbc", "BBC News", "bbc.co.uk", LeftCenter, 90),
            ("aljazeera", "Al Jazeera", "aljazeera.com", LeftCenter, 75),
            ("npr", "NPR", "npr.org", LeftCenter, 88),
            ("wsj", "Wall Street Journal", "wsj.com", RightCenter, 85),
            ("nyt", "New York Times", "nytimes.com", LeftCenter, 82),
            ("wapo", "Washington Post", "washingtonpost.com", LeftCenter, 80),
            ("guardian", "The Guardian", "theguardian.com", LeftCenter, 78),
            ("politico", "Politico", "politico.com", LeftCenter, 77),
            ("abc", "ABC News", "abcnews.go.com", LeftCenter, 80),
            ("cbs", "CBS News", "cbsnews.com", LeftCenter, 78),
            ("skynews", "Sky News", "news.sky.com", Center, 82),
            ("dw", "Deutsche Welle", "dw.com", Center, 88),
            ("france24", "France 24", "france24.com", Center, 85),
            ("nypost", "New York Post", "nypost.com", RightCenter, 62),
            ("telegraph", "The Telegraph", "telegraph.co.uk", RightCenter, 78),
            ("toi", "Times of India", "timesofindia.indiatimes.com", Center, 74),
            ("scmp", "South China Morning Post", "scmp.com", Center, 74),
            ("cnn", "CNN", "cnn.com", Left, 65),
            ("msnbc", "MSNBC", "msnbc.com", Left, 58),
            ("fox", "Fox News", "foxnews.com", Right, 55),
            ("huffpost", "HuffPost", "huffpost.com", Left, 50),
            ("dailywire", "Daily Wire", "dailywire.com", Right, 45),
            ("breitbart", "Breitbart", "breitbart.com", Right, 30),
        ];

        Self::from_sources(seed.into_iter().map(|(id, name, domain, bias, rating)| Source {
            id: id.to_string(),
            name: name.to_string(),
            domain: domain.to_string(),
            bias,
            factual_rating: rating,
        }))
    }
}

/// Canonical host key: trimmed, lowercase, without a leading `www.`.
pub fn normalize_domain(domain: &str) -> String {
    let d = domain.trim().to_ascii_lowercase();
    match d.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => d,
    }
}
