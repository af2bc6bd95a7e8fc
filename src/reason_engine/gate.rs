//! Quality gate (spec.md §4.3 step 2): a candidate survives only with a
//! usable http/https URL, a `published_at`, and a non-empty trimmed summary.

use chrono::{DateTime, Utc};

use crate::reason_engine::adapter::Candidate;
use crate::reason_engine::canonical::canonicalize;

/// A candidate that passed the gate, with its canonical URL attached.
#[derive(Debug, Clone)]
pub struct GatedCandidate {
    pub canonical_url: String,
    pub published_at: DateTime<Utc>,
    pub summary: String,
    pub reason_type: crate::models::ReasonType,
}

pub fn apply_gate(candidates: Vec<Candidate>) -> Vec<GatedCandidate> {
    candidates
        .into_iter()
        .filter_map(|c| {
            let summary = c.summary.trim().to_string();
            if summary.is_empty() {
                return None;
            }
            let published_at = c.published_at?;
            let raw_url = c.source_url?;
            let canonical_url = canonicalize(&raw_url)?;
            Some(GatedCandidate { canonical_url, published_at, summary, reason_type: c.reason_type })
        })
        .collect()
}

/// Merge candidates sharing a canonical URL (spec.md §4.3 step 3): keep the
/// earlier `published_at`, and the longer non-empty summary between the two.
pub fn dedupe_by_canonical_url(candidates: Vec<GatedCandidate>) -> Vec<GatedCandidate> {
    let mut merged: std::collections::HashMap<String, GatedCandidate> = std::collections::HashMap::new();
    for candidate in candidates {
        merged
            .entry(candidate.canonical_url.clone())
            .and_modify(|existing| {
                if candidate.published_at < existing.published_at {
                    existing.published_at = candidate.published_at;
                }
                if candidate.summary.len() > existing.summary.len() {
                    existing.summary = candidate.summary.clone();
                }
            })
            .or_insert(candidate);
    }
    merged.into_values().collect()
}
