use ingest::Coordinates;
use serde::{Deserialize, Serialize};

/// A provisional link between an inscription and a gazetteer place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrantCandidate {
    pub inscription_id: String,
    /// Gazetteer persistent id.
    pub pid: String,
    /// Display label of the origin place.
    pub origin: String,
    /// Literal surface forms found in the text, in text order.
    pub forms: Vec<String>,
    pub origin_coords: Option<Coordinates>,
    pub find_coords: Option<Coordinates>,
    /// Kilometres between find-spot and origin. Unset until resolved, and
    /// left unset when either end has no coordinates.
    pub distance: Option<f64>,
    /// Origin coordinates are known.
    pub located: bool,
}

impl MigrantCandidate {
    /// Matched forms as one comma-joined string.
    pub fn toponym(&self) -> String {
        self.forms.join(",")
    }
}
