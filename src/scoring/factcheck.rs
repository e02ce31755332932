// src/scoring/factcheck.rs
//! Fact-check evidence: standardized verdicts, textual rating mapping, and the
//! per-article evidence index handed to the pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Five-point verdict scale used by fact-check publishers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    True,
    MostlyTrue,
    Mixed,
    MostlyFalse,
    False,
}

impl Verdict {
    pub fn score(self) -> u8 {
        match self {
            Verdict::True => 100,
            Verdict::MostlyTrue => 80,
            Verdict::Mixed => 50,
            Verdict::MostlyFalse => 20,
            Verdict::False => 0,
        }
    }

    /// Map a publisher's free-text rating ("Mostly True", "Pants on Fire", ...).
    /// Anything unrecognised is MIXED.
    pub fn from_textual(rating: &str) -> Self {
        let lower = rating.trim().to_lowercase();
        let has = |needle: &str| lower.contains(needle);

        // "Half true" is MIXED, never TRUE, even though it contains "true".
        if has("true") && !has("false") && !has("partly") && !has("mostly") && !has("half") {
            return Verdict::True;
        }
        if has("mostly true") || has("mostly correct") {
            return Verdict::MostlyTrue;
        }
        if has("mixed") || has("partly") || has("half") {
            return Verdict::Mixed;
        }
        if has("mostly false") || has("mostly incorrect") {
            return Verdict::MostlyFalse;
        }
        if has("false") || has("pants on fire") || has("incorrect") {
            return Verdict::False;
        }
        Verdict::Mixed
    }
}

/// One fact-check review matched to a claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckResult {
    pub claim: String,
    pub rating: Verdict,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub url: String,
}

/// Evidence keyed by article id. A missing key means "no data".
pub type FactCheckIndex = HashMap<String, Vec<FactCheckResult>>;

/// Mean verdict score, rounded; `neutral` when there is no evidence.
pub fn fact_check_score(evidence: &[FactCheckResult], neutral: u8) -> u8 {
    if evidence.is_empty() {
        return neutral;
    }
    let total: f64 = evidence.iter().map(|fc| f64::from(fc.rating.score())).sum();
    (total / evidence.len() as f64).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fc(rating: Verdict) -> FactCheckResult {
        FactCheckResult {
            claim: "claim".into(),
            rating,
            source: "PolitiFact".into(),
            url: String::new(),
        }
    }

    #[test]
    fn half_true_never_reads_as_true() {
        for raw in ["Half True", "half-true", "HALF TRUE ", "Half true claim"] {
            assert_eq!(Verdict::from_textual(raw), Verdict::Mixed, "{raw}");
        }
    }

    #[test]
    fn textual_mapping() {
        assert_eq!(Verdict::from_textual("True"), Verdict::True);
        assert_eq!(Verdict::from_textual("Mostly True"), Verdict::MostlyTrue);
        assert_eq!(Verdict::from_textual("mostly correct"), Verdict::MostlyTrue);
        assert_eq!(Verdict::from_textual("Half True"), Verdict::Mixed);
        assert_eq!(Verdict::from_textual("Partly false"), Verdict::Mixed);
        assert_eq!(Verdict::from_textual("Mostly False"), Verdict::MostlyFalse);
        assert_eq!(Verdict::from_textual("Pants on Fire!"), Verdict::False);
        assert_eq!(Verdict::from_textual("FALSE"), Verdict::False);
        assert_eq!(Verdict::from_textual("Misleading"), Verdict::Mixed);
        assert_eq!(Verdict::from_textual(""), Verdict::Mixed);
    }

    #[test]
    fn no_evidence_is_neutral_not_penalized() {
        assert_eq!(fact_check_score(&[], 50), 50);
    }

    #[test]
    fn averages_mapped_verdicts() {
        assert_eq!(fact_check_score(&[fc(Verdict::True), fc(Verdict::False)], 50), 50);
        assert_eq!(
            fact_check_score(&[fc(Verdict::MostlyTrue), fc(Verdict::True), fc(Verdict::Mixed)], 50),
            77
        );
    }

    #[test]
    fn verdict_wire_format() {
        let v = serde_json::to_value(Verdict::MostlyTrue).unwrap();
        assert_eq!(v, serde_json::json!("MOSTLY_TRUE"));
    }
}
