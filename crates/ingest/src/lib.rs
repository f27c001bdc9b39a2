pub mod edcs;
pub mod error;
pub mod gazetteer;
pub mod province;
pub mod reader;
pub mod record;

pub use edcs::decode_fields;
pub use error::LookupError;
pub use gazetteer::GazetteerEntry;
pub use province::normalize_province;
pub use reader::FileReader;
pub use record::{Coordinates, InscriptionRecord};

use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// Load the raw inscription set. Later duplicates of an id are dropped.
pub async fn load_inscriptions(path: &Path) -> Result<Vec<InscriptionRecord>> {
    let records: Vec<InscriptionRecord> = FileReader::read_records(path, "inscriptions").await?;
    let records = dedup_by_id(records);
    info!(records = records.len(), path = %path.display(), "Loaded inscriptions");
    Ok(records)
}

/// Load the gazetteer. An empty gazetteer is fatal.
pub async fn load_gazetteer(path: &Path) -> Result<Vec<GazetteerEntry>> {
    let entries: Vec<GazetteerEntry> = FileReader::read_records(path, "gazetteer").await?;
    if entries.is_empty() {
        return Err(LookupError::Empty {
            what: "gazetteer",
            path: path.to_path_buf(),
        }
        .into());
    }
    info!(entries = entries.len(), path = %path.display(), "Loaded gazetteer");
    Ok(entries)
}

/// Load raw name-authority headwords. An empty list is fatal.
pub async fn load_name_headwords(path: &Path) -> Result<Vec<String>> {
    let names = FileReader::read_lines(path, "name authority").await?;
    if names.is_empty() {
        return Err(LookupError::Empty {
            what: "name authority",
            path: path.to_path_buf(),
        }
        .into());
    }
    info!(headwords = names.len(), path = %path.display(), "Loaded name authority");
    Ok(names)
}

/// Decode scraped fragment lists, skipping the ones without an id.
pub fn decode_all(inscriptions: &[Vec<String>]) -> Vec<InscriptionRecord> {
    let records: Vec<InscriptionRecord> = inscriptions
        .iter()
        .filter_map(|fields| decode_fields(fields))
        .collect();
    dedup_by_id(records)
}

fn dedup_by_id(records: Vec<InscriptionRecord>) -> Vec<InscriptionRecord> {
    let mut seen = HashSet::new();
    let total = records.len();
    let unique: Vec<InscriptionRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect();
    if unique.len() < total {
        warn!(dropped = total - unique.len(), "Dropped inscriptions with duplicate ids");
    }
    unique
}
