use extract::EnrichedRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::candidate::MigrantCandidate;

/// Origin columns carried by migrating inscriptions in the master table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginFields {
    pub origo: String,
    pub pid: String,
    pub toponym: String,
    pub origo_lat: Option<f64>,
    pub origo_long: Option<f64>,
    pub located: bool,
    pub distance: Option<f64>,
}

impl From<&MigrantCandidate> for OriginFields {
    fn from(c: &MigrantCandidate) -> Self {
        Self {
            origo: c.origin.clone(),
            pid: c.pid.clone(),
            toponym: c.toponym(),
            origo_lat: c.origin_coords.map(|o| o.lat),
            origo_long: c.origin_coords.map(|o| o.long),
            located: c.located,
            distance: c.distance,
        }
    }
}

/// One inscription of the full set, with its origin when it has one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasterRow {
    #[serde(flatten)]
    pub inscription: EnrichedRecord,
    pub migrant: bool,
    #[serde(flatten)]
    pub origin: Option<OriginFields>,
}

/// Left-join resolved migrants onto every enriched record, ordered by id.
pub fn join_master(records: &[EnrichedRecord], migrants: &[MigrantCandidate]) -> Vec<MasterRow> {
    let by_id: HashMap<&str, &MigrantCandidate> = migrants
        .iter()
        .map(|m| (m.inscription_id.as_str(), m))
        .collect();

    let mut rows: Vec<MasterRow> = records
        .iter()
        .map(|record| {
            let origin = by_id.get(record.id()).map(|m| OriginFields::from(*m));
            MasterRow {
                inscription: record.clone(),
                migrant: origin.is_some(),
                origin,
            }
        })
        .collect();
    rows.sort_by(|a, b| a.inscription.id().cmp(b.inscription.id()));
    rows
}
