use serde::{Deserialize, Serialize};

use crate::record::Coordinates;

/// One ancient place from the gazetteer dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GazetteerEntry {
    pub pid: String,
    /// Display title of the place.
    #[serde(default)]
    pub title: Option<String>,
    /// Raw transliterated name field. May hold several variants separated by
    /// `,` or `/`, plus editorial markup.
    #[serde(default, alias = "nameTransliterated")]
    pub name: Option<String>,
    #[serde(default, alias = "reprLat")]
    pub repr_lat: Option<f64>,
    #[serde(default, alias = "reprLong")]
    pub repr_long: Option<f64>,
    /// Era codes, one character each (e.g. `"HRL"`).
    #[serde(default, alias = "timePeriods")]
    pub time_periods: Option<String>,
}

impl GazetteerEntry {
    pub fn coords(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.repr_lat, self.repr_long)
    }

    /// Human readable origin label: title if present, otherwise the raw name.
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(self.pid.as_str())
    }

    /// Whether the entry applies to the period of interest.
    ///
    /// Entries without a tag stay eligible.
    pub fn is_in_eras(&self, eras: &str) -> bool {
        match self.time_periods.as_deref() {
            None => true,
            Some(tags) => tags.chars().any(|code| eras.contains(code)),
        }
    }
}
