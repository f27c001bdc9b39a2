use ingest::{Coordinates, InscriptionRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
    #[serde(rename = "unknown")]
    Unknown,
}

/// Legal status codes as keyed on by the analysis side:
/// 0 slave, 1 freed, 2 freeborn, -1 unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum LegalStatus {
    Slave,
    Freed,
    Free,
    Unknown,
}

impl From<LegalStatus> for i8 {
    fn from(status: LegalStatus) -> Self {
        match status {
            LegalStatus::Slave => 0,
            LegalStatus::Freed => 1,
            LegalStatus::Free => 2,
            LegalStatus::Unknown => -1,
        }
    }
}

impl TryFrom<i8> for LegalStatus {
    type Error = String;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(LegalStatus::Slave),
            1 => Ok(LegalStatus::Freed),
            2 => Ok(LegalStatus::Free),
            -1 => Ok(LegalStatus::Unknown),
            other => Err(format!("invalid legal status code {}", other)),
        }
    }
}

/// Per-signal gender readings; `None` is indeterminate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalReadings {
    pub gender_keywords: Option<Gender>,
    pub gender_filiation: Option<Gender>,
    pub gender_servile: Option<Gender>,
    pub gender_first_word: Option<Gender>,
    /// Name next to an origin word. Reported only, never combined.
    pub gender_origin_name: Option<Gender>,
}

/// Everything the classifier derives for one inscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    /// Accepted personal names, comma separated, first-seen order.
    pub name: String,
    pub contains_name: bool,
    pub gender: Gender,
    #[serde(flatten)]
    pub signals: SignalReadings,
    pub legal_status: LegalStatus,
    pub slave: bool,
    pub freed: bool,
    pub freeborn: bool,
    pub funerary: bool,
    pub location_indicator: bool,
}

impl Demographics {
    pub fn unknown() -> Self {
        Self {
            name: String::new(),
            contains_name: false,
            gender: Gender::Unknown,
            signals: SignalReadings::default(),
            legal_status: LegalStatus::Unknown,
            slave: false,
            freed: false,
            freeborn: false,
            funerary: false,
            location_indicator: false,
        }
    }
}

/// A raw record plus the cleaned text and classifier output.
///
/// Built once by [`crate::Extractor`]; later stages only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: InscriptionRecord,
    pub cleantext: Option<String>,
    pub text_length: Option<usize>,
    /// Province mapped onto the closed region set.
    pub region: Option<String>,
    #[serde(flatten)]
    pub demographics: Demographics,
}

impl EnrichedRecord {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn find_coords(&self) -> Option<Coordinates> {
        self.record.find_coords()
    }
}
