pub mod stemmer;

pub use stemmer::{GazetteerStemmer, StemmerConfig};

use ingest::GazetteerEntry;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A gazetteer entry together with its derived stems.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedPlace {
    pub entry: GazetteerEntry,
    pub stems: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub entries: usize,
    pub eligible: usize,
    pub with_stems: usize,
    pub stems: usize,
}

/// Read-only table of places that can be matched, in gazetteer order.
#[derive(Debug, Clone, Default)]
pub struct GazetteerIndex {
    places: Vec<IndexedPlace>,
    stats: IndexStats,
}

impl GazetteerIndex {
    /// Stem every entry; entries without stems are left out.
    pub fn build(entries: Vec<GazetteerEntry>, stemmer: &GazetteerStemmer) -> Self {
        let mut stats = IndexStats {
            entries: entries.len(),
            ..Default::default()
        };
        let mut places = Vec::new();

        for entry in entries {
            if !stemmer.is_eligible(&entry) {
                continue;
            }
            stats.eligible += 1;

            let stems = stemmer.derive_stems(&entry);
            if stems.is_empty() {
                debug!(pid = %entry.pid, "No stems for gazetteer entry");
                continue;
            }
            stats.with_stems += 1;
            stats.stems += stems.len();
            places.push(IndexedPlace { entry, stems });
        }

        info!(
            entries = stats.entries,
            eligible = stats.eligible,
            with_stems = stats.with_stems,
            stems = stats.stems,
            "Built gazetteer stem index"
        );
        Self { places, stats }
    }

    pub fn places(&self) -> &[IndexedPlace] {
        &self.places
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}
