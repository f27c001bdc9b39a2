use anyhow::{Context, Result};
use extract::EnrichedRecord;
use index::{GazetteerIndex, IndexedPlace};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::candidate::MigrantCandidate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Origin-adjective ending appended to every stem (the `-ensis` family).
    pub suffix_pattern: String,
    /// Capitalized word families that share the ending but are not origins
    /// (`Menses`, `Mensibus`).
    pub blocked_prefixes: Vec<String>,
    /// Log progress every this many gazetteer places.
    pub progress_every: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            suffix_pattern: "ens(?:is|i|em|e|es|ium|ia|ibus)".to_string(),
            blocked_prefixes: vec!["Mens".to_string()],
            progress_every: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTrace {
    pub funerary_records: usize,
    pub places_scanned: usize,
    pub stems_scanned: usize,
    pub raw_candidates: usize,
    pub false_positives: usize,
    pub duplicates: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    /// Every match, before any filtering.
    pub raw: Vec<MigrantCandidate>,
    /// Matches that survived false-positive suppression and deduplication.
    pub candidates: Vec<MigrantCandidate>,
    pub trace: MatchTrace,
}

/// Scans funerary inscriptions for origin adjectives built on gazetteer stems.
#[derive(Debug, Clone, Default)]
pub struct MigrantMatcher {
    config: MatcherConfig,
}

impl MigrantMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Cross-match every stem of every place against every funerary text.
    ///
    /// Candidates come out in scan order: place, then stem, then inscription.
    pub fn find_candidates(
        &self,
        records: &[EnrichedRecord],
        index: &GazetteerIndex,
    ) -> Result<MatchResult> {
        let funerary: Vec<(&EnrichedRecord, &str)> = records
            .iter()
            .filter(|r| r.demographics.funerary)
            .filter_map(|r| r.cleantext.as_deref().map(|text| (r, text)))
            .collect();

        let mut trace = MatchTrace {
            funerary_records: funerary.len(),
            ..Default::default()
        };
        let mut raw = Vec::new();

        for (n, place) in index.places().iter().enumerate() {
            if n > 0 && n % self.config.progress_every.max(1) == 0 {
                info!(
                    places = n,
                    total = index.len(),
                    found = raw.len(),
                    "Searching toponyms"
                );
            }
            for stem in &place.stems {
                let pattern = self.stem_pattern(stem)?;
                for (record, text) in &funerary {
                    // Cheap substring check before running the regex.
                    if !text.contains(stem.as_str()) {
                        continue;
                    }
                    let forms: Vec<String> = pattern
                        .find_iter(text)
                        .map(|m| m.as_str().to_string())
                        .collect();
                    if !forms.is_empty() {
                        raw.push(candidate(record, place, forms));
                    }
                }
                trace.stems_scanned += 1;
            }
            trace.places_scanned += 1;
        }
        trace.raw_candidates = raw.len();

        let filtered: Vec<MigrantCandidate> = raw
            .iter()
            .filter(|c| !self.is_false_positive(c))
            .cloned()
            .collect();
        trace.false_positives = raw.len() - filtered.len();

        let candidates = dedup_by_origin(filtered);
        trace.duplicates = raw.len() - trace.false_positives - candidates.len();

        info!(
            funerary = trace.funerary_records,
            raw = trace.raw_candidates,
            false_positives = trace.false_positives,
            duplicates = trace.duplicates,
            candidates = candidates.len(),
            "Searched all toponyms"
        );

        Ok(MatchResult {
            raw,
            candidates,
            trace,
        })
    }

    /// Word-bounded stem plus the origin-adjective ending.
    pub fn stem_pattern(&self, stem: &str) -> Result<Regex> {
        let pattern = format!(
            r"\b{}{}\b",
            regex::escape(stem),
            self.config.suffix_pattern
        );
        Regex::new(&pattern).with_context(|| format!("Invalid pattern for stem {:?}", stem))
    }

    /// An all-lowercase form is a common word sharing the ending; a blocked
    /// prefix marks a known non-origin family.
    pub fn is_false_positive(&self, candidate: &MigrantCandidate) -> bool {
        candidate.forms.iter().any(|form| {
            let lowercase = form.chars().all(|c| c.is_ascii_lowercase());
            let blocked = self.config.blocked_prefixes.iter().any(|prefix| {
                form.strip_prefix(prefix.as_str())
                    .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_lowercase()))
            });
            if lowercase || blocked {
                debug!(form = %form, id = %candidate.inscription_id, "Dropping non-origin match");
            }
            lowercase || blocked
        })
    }
}

fn candidate(record: &EnrichedRecord, place: &IndexedPlace, forms: Vec<String>) -> MigrantCandidate {
    let origin_coords = place.entry.coords();
    MigrantCandidate {
        inscription_id: record.id().to_string(),
        pid: place.entry.pid.clone(),
        origin: place.entry.label().to_string(),
        forms,
        origin_coords,
        find_coords: record.find_coords(),
        distance: None,
        located: origin_coords.is_some(),
    }
}

/// Keep the first candidate per (inscription, origin coordinates).
fn dedup_by_origin(candidates: Vec<MigrantCandidate>) -> Vec<MigrantCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| {
            let coords = c.origin_coords.map(|o| (o.lat.to_bits(), o.long.to_bits()));
            seen.insert((c.inscription_id.clone(), coords))
        })
        .collect()
}
