use anyhow::{Context, Result};
use extract::Lexicon;
use index::StemmerConfig;
use query::{MatcherConfig, ResolverConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mode: OperationMode,
    /// Default log filter when `RUST_LOG` is not set.
    pub log_level: String,
    pub names: NameSource,
    pub lexicon: Lexicon,
    pub stemmer: StemmerConfig,
    pub matcher: MatcherConfig,
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    Default, // Keep unlocated origins, 10 km threshold
    Strict,  // Only measured origins, wider threshold
}

/// Shape of the name-authority file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum NameSource {
    /// One nominative headword per entry.
    Headwords,
    /// Prosopographical entries with markup and praenomen abbreviations.
    Annotated,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: OperationMode::Default,
            log_level: "info".to_string(),
            names: NameSource::Headwords,
            lexicon: Lexicon::default(),
            stemmer: StemmerConfig::default(),
            matcher: MatcherConfig::default(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn strict() -> Self {
        Self {
            mode: OperationMode::Strict,
            resolver: ResolverConfig {
                threshold_km: 25.0,
                require_distance: true,
                ..ResolverConfig::default()
            },
            ..Self::default()
        }
    }

    /// Read a JSON config file; missing keys keep their defaults.
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }
}
