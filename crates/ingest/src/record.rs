use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub long: f64,
}

impl Coordinates {
    pub fn new(lat: f64, long: f64) -> Self {
        Self { lat, long }
    }

    /// Round both components to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> Self {
        let factor = 10f64.powi(decimals as i32);
        Self {
            lat: (self.lat * factor).round() / factor,
            long: (self.long * factor).round() / factor,
        }
    }

    /// Build from two optional components. Both must be present and finite;
    /// a missing half never turns into 0.0.
    pub fn from_parts(lat: Option<f64>, long: Option<f64>) -> Option<Self> {
        match (lat, long) {
            (Some(lat), Some(long)) if lat.is_finite() && long.is_finite() => {
                Some(Self { lat, long })
            }
            _ => None,
        }
    }
}

/// One epigraphic document as delivered by the acquisition side.
///
/// Every optional field is `None` when the source did not carry it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InscriptionRecord {
    #[serde(rename = "edcs_id", alias = "edcs-id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub publication: Option<String>,
    #[serde(default)]
    pub time_from: Option<i32>,
    #[serde(default)]
    pub time_to: Option<i32>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub findspot: Option<String>,
    #[serde(default)]
    pub find_lat: Option<f64>,
    #[serde(default)]
    pub find_long: Option<f64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl InscriptionRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn find_coords(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.find_lat, self.find_long)
    }

    /// Keyword tags, or an empty string when the record has none.
    pub fn keyword_text(&self) -> &str {
        self.keywords.as_deref().unwrap_or("")
    }
}
