pub mod classifier;
pub mod lexicon;
pub mod names;
pub mod normalizer;
pub mod schema;

pub use classifier::DemographicClassifier;
pub use lexicon::Lexicon;
pub use names::NameAuthority;
pub use normalizer::TextNormalizer;
pub use schema::{Demographics, EnrichedRecord, Gender, LegalStatus, SignalReadings};

use anyhow::{Result, bail};
use ingest::{InscriptionRecord, normalize_province};
use tracing::{debug, info};

/// Cleans and classifies raw inscriptions.
pub struct Extractor {
    normalizer: TextNormalizer,
    classifier: DemographicClassifier,
    authority: NameAuthority,
}

impl Extractor {
    pub fn new(lexicon: Lexicon, authority: NameAuthority) -> Result<Self> {
        if authority.is_empty() {
            bail!("Name authority is empty");
        }
        Ok(Self {
            normalizer: TextNormalizer::new()?,
            classifier: DemographicClassifier::new(lexicon)?,
            authority,
        })
    }

    /// Enrich a single record with cleaned text, region and demographics.
    pub fn enrich(&self, record: InscriptionRecord) -> EnrichedRecord {
        let cleantext = self.normalizer.normalize_opt(record.text.as_deref());
        let text_length = cleantext.as_ref().map(|t| t.chars().count());
        let region = record.province.as_deref().map(normalize_province);
        let demographics =
            self.classifier
                .classify(cleantext.as_deref(), record.keyword_text(), &self.authority);

        EnrichedRecord {
            record,
            cleantext,
            text_length,
            region,
            demographics,
        }
    }

    /// Enrich a whole set, preserving order.
    pub fn enrich_all(&self, records: Vec<InscriptionRecord>) -> Vec<EnrichedRecord> {
        let total = records.len();
        let mut enriched = Vec::with_capacity(total);

        for (i, record) in records.into_iter().enumerate() {
            if record.text.is_none() {
                debug!(id = %record.id, "Inscription has no text");
            }
            enriched.push(self.enrich(record));
            if (i + 1) % 10_000 == 0 {
                info!(done = i + 1, total, "Enriching inscriptions");
            }
        }

        let funerary = enriched.iter().filter(|r| r.demographics.funerary).count();
        info!(records = total, funerary, "Enriched inscriptions");
        enriched
    }
}
