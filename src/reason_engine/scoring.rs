//! Three-signal scoring (spec.md §4.3 step 4) and ranking (step 5).

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use crate::models::{ConfidenceBreakdown, ScoreBreakdown};
use crate::reason_engine::gate::GatedCandidate;

lazy_static! {
    /// Static reputation table keyed by host (spec.md §9 open question b:
    /// "data, not code"). Hardcoded defaults until an external feed is
    /// wired in; unknown hosts fall back to `DEFAULT_RELIABILITY`.
    static ref REPUTATION_TABLE: HashMap<&'static str, f64> = {
        let mut m = HashMap::new();
        m.insert("sec.gov", 0.98);
        m.insert("dart.fss.or.kr", 0.97);
        m.insert("reuters.com", 0.9);
        m.insert("bloomberg.com", 0.9);
        m.insert("wsj.com", 0.88);
        m.insert("finance.yahoo.com", 0.65);
        m
    };
}

const DEFAULT_RELIABILITY: f64 = 0.4;

pub const DEFAULT_WEIGHTS: [f64; 3] = [0.4, 0.3, 0.3];

pub fn source_reliability(canonical_url: &str) -> f64 {
    Url::parse(canonical_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
        .and_then(|host| REPUTATION_TABLE.get(host.as_str()).copied())
        .unwrap_or(DEFAULT_RELIABILITY)
}

/// Lexical overlap between candidate text and the event's descriptors
/// (symbol, market), normalized to [0,1] by Jaccard similarity over
/// lowercased word sets.
pub fn event_match(summary: &str, descriptors: &[&str]) -> f64 {
    let words: std::collections::HashSet<String> =
        summary.to_lowercase().split_whitespace().map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string()).collect();
    let descriptor_words: std::collections::HashSet<String> =
        descriptors.iter().map(|d| d.to_lowercase()).collect();
    if descriptor_words.is_empty() || words.is_empty() {
        return 0.0;
    }
    let overlap = words.intersection(&descriptor_words).count();
    let union = words.union(&descriptor_words).count();
    if union == 0 {
        0.0
    } else {
        (overlap as f64 / union as f64).min(1.0)
    }
}

pub fn time_proximity(published_at: DateTime<Utc>, detected_at_utc: DateTime<Utc>, horizon: Duration) -> f64 {
    let distance = (detected_at_utc - published_at).num_seconds().unsigned_abs();
    let horizon_secs = horizon.as_secs().max(1);
    (1.0 - (distance as f64 / horizon_secs as f64)).max(0.0)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// A scored candidate ready for ranking.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: GatedCandidate,
    pub breakdown: ConfidenceBreakdown,
}

pub fn score(
    candidate: GatedCandidate,
    descriptors: &[&str],
    detected_at_utc: DateTime<Utc>,
    proximity_horizon: Duration,
    weights: [f64; 3],
) -> ScoredCandidate {
    let signals = [
        round2(source_reliability(&candidate.canonical_url)),
        round2(event_match(&candidate.summary, descriptors)),
        round2(time_proximity(candidate.published_at, detected_at_utc, proximity_horizon)),
    ];
    let total = round2(weights.iter().zip(signals.iter()).map(|(w, s)| w * s).sum());
    let breakdown = ConfidenceBreakdown {
        weights,
        signals,
        score_breakdown: ScoreBreakdown {
            source_reliability: signals[0],
            event_match: signals[1],
            time_proximity: signals[2],
            total,
        },
    };
    ScoredCandidate { candidate, breakdown }
}

/// Rank by total descending; tie-break by (a) higher source_reliability,
/// (b) earlier published_at, (c) lexicographic canonical URL. Keep top 3.
pub fn rank_top_3(mut scored: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    scored.sort_by(|a, b| {
        b.breakdown
            .score_breakdown
            .total
            .partial_cmp(&a.breakdown.score_breakdown.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.breakdown
                    .score_breakdown
                    .source_reliability
                    .partial_cmp(&a.breakdown.score_breakdown.source_reliability)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.candidate.published_at.cmp(&b.candidate.published_at))
            .then_with(|| a.candidate.canonical_url.cmp(&b.candidate.canonical_url))
    });
    scored.truncate(3);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_matches_weighted_sum_within_tolerance() {
        let candidate = GatedCandidate {
            canonical_url: "https://reuters.com/a".into(),
            published_at: Utc::now(),
            summary: "apple reports strong earnings".into(),
            reason_type: crate::models::ReasonType::News,
        };
        let scored = score(candidate, &["apple"], Utc::now(), Duration::from_secs(3600 * 12), DEFAULT_WEIGHTS);
        let b = &scored.breakdown.score_breakdown;
        let expected: f64 = scored
            .breakdown
            .weights
            .iter()
            .zip(scored.breakdown.signals.iter())
            .map(|(w, s)| w * s)
            .sum();
        assert!((b.total - expected).abs() <= 0.01);
    }

    #[test]
    fn ranking_keeps_only_top_three() {
        let mut candidates = Vec::new();
        for i in 0..5 {
            let c = GatedCandidate {
                canonical_url: format!("https://reuters.com/{i}"),
                published_at: Utc::now(),
                summary: "relevant content".into(),
                reason_type: crate::models::ReasonType::News,
            };
            candidates.push(score(c, &[], Utc::now(), Duration::from_secs(3600), DEFAULT_WEIGHTS));
        }
        let ranked = rank_top_3(candidates);
        assert_eq!(ranked.len(), 3);
    }
}
