// src/overrides.rs
//! Source trust overrides.
//!
//! An override is a pure function `(base_factual_rating, domain) -> effective_rating`
//! applied ahead of the validity scorer. Sources themselves are never mutated.
//!
//! JSON shape (`config/overrides.json`), keyed by domain:
//! {
//!   "foxnews.com": { "mode": "DELTA", "value": -10, "note": "too noisy" },
//!   "apnews.com":  { "mode": "ABS",   "value": 99 }
//! }

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path};
use tracing::warn;

use crate::error::Result;
use crate::source_registry::normalize_domain;

pub const DEFAULT_OVERRIDES_PATH: &str = "config/overrides.json";
pub const ENV_OVERRIDES_PATH: &str = "VERITAS_OVERRIDES_PATH";

/// Pluggable effective-rating function. Must be pure and thread-safe.
pub trait TrustOverride: Send + Sync {
    fn effective_rating(&self, base: u8, domain: &str) -> u8;
}

/// Identity: every source keeps its registry rating.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverride;

impl TrustOverride for NoOverride {
    fn effective_rating(&self, base: u8, _domain: &str) -> u8 {
        base
    }
}

impl<F> TrustOverride for F
where
    F: Fn(u8, &str) -> u8 + Send + Sync,
{
    fn effective_rating(&self, base: u8, domain: &str) -> u8 {
        self(base, domain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverrideMode {
    /// Replace the rating with `value`.
    Abs,
    /// Add `value` (may be negative) to the rating.
    Delta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceOverride {
    pub mode: OverrideMode,
    pub value: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SourceOverride {
    pub fn apply(&self, base: u8) -> u8 {
        let raw = match self.mode {
            OverrideMode::Abs => self.value,
            OverrideMode::Delta => i32::from(base) + self.value,
        };
        raw.clamp(0, 100) as u8
    }
}

/// Per-domain override table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideTable {
    entries: HashMap<String, SourceOverride>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, domain: &str, ov: SourceOverride) {
        self.entries.insert(normalize_domain(domain), ov);
    }

    pub fn remove(&mut self, domain: &str) -> Option<SourceOverride> {
        self.entries.remove(&normalize_domain(domain))
    }

    pub fn get(&self, domain: &str) -> Option<&SourceOverride> {
        self.entries.get(&normalize_domain(domain))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let raw: HashMap<String, SourceOverride> = serde_json::from_str(s)?;
        let mut table = Self::new();
        for (domain, ov) in raw {
            table.insert(&domain, ov);
        }
        Ok(table)
    }

    /// Load from a JSON file. A missing or broken file means "no overrides".
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(s) => Self::from_json_str(&s).unwrap_or_else(|e| {
                warn!(target: "veritas", path = %path.display(), error = %e, "ignoring unreadable overrides file");
                Self::new()
            }),
            Err(_) => Self::new(),
        }
    }

    /// `$VERITAS_OVERRIDES_PATH`, else `config/overrides.json`.
    pub fn from_env() -> Self {
        let path = std::env::var(ENV_OVERRIDES_PATH)
            .unwrap_or_else(|_| DEFAULT_OVERRIDES_PATH.to_string());
        Self::load_from_file(path)
    }
}

impl TrustOverride for OverrideTable {
    fn effective_rating(&self, base: u8, domain: &str) -> u8 {
        match self.get(domain) {
            Some(ov) => ov.apply(base),
            None => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> OverrideTable {
        OverrideTable::from_json_str(
            r#"{
                "www.FoxNews.com": { "mode": "DELTA", "value": -10, "note": "noisy" },
                "apnews.com": { "mode": "ABS", "value": 140 },
                "cnn.com": { "mode": "DELTA", "value": -90 }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn delta_and_abs_are_clamped() {
        let t = table();
        assert_eq!(t.effective_rating(55, "foxnews.com"), 45);
        assert_eq!(t.effective_rating(96, "apnews.com"), 100);
        assert_eq!(t.effective_rating(65, "cnn.com"), 0);
    }

    #[test]
    fn unknown_domain_passes_through() {
        assert_eq!(table().effective_rating(72, "bbc.com"), 72);
        assert_eq!(NoOverride.effective_rating(72, "bbc.com"), 72);
    }

    #[test]
    fn closures_are_overrides() {
        let halve = |base: u8, _domain: &str| base / 2;
        assert_eq!(halve.effective_rating(80, "x.com"), 40);
    }

    #[test]
    fn missing_file_means_no_overrides() {
        let t = OverrideTable::load_from_file("definitely/not/here.json");
        assert!(t.is_empty());
    }

    #[serial_test::serial]
    #[test]
    fn env_path_is_honoured() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("overrides.json");
        fs::write(&p, r#"{ "nypost.com": { "mode": "ABS", "value": 20 } }"#).unwrap();

        std::env::set_var(ENV_OVERRIDES_PATH, p.display().to_string());
        let t = OverrideTable::from_env();
        std::env::remove_var(ENV_OVERRIDES_PATH);

        assert_eq!(t.len(), 1);
        assert_eq!(t.effective_rating(62, "www.nypost.com"), 20);
    }
}
