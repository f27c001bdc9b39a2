use extract::normalizer::{place_name_variants, strip_tags};
use ingest::GazetteerEntry;
use serde::{Deserialize, Serialize};

/// Tables used to turn gazetteer names into toponym stems.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StemmerConfig {
    /// Era codes of the period of interest.
    pub eras: String,
    /// Over-generic fragments that match military and naval vocabulary.
    pub blocklist: Vec<String>,
    pub vowels: String,
    /// Shortest stem kept, in characters.
    pub min_stem_len: usize,
}

impl Default for StemmerConfig {
    fn default() -> Self {
        Self {
            eras: "HRL".to_string(),
            blocklist: vec!["Castr".to_string(), "Fret".to_string(), "Misen".to_string()],
            vowels: "aeiou".to_string(),
            min_stem_len: 3,
        }
    }
}

/// Derives adjective-ready stems from gazetteer place names.
#[derive(Debug, Clone, Default)]
pub struct GazetteerStemmer {
    config: StemmerConfig,
}

impl GazetteerStemmer {
    pub fn new(config: StemmerConfig) -> Self {
        Self { config }
    }

    pub fn is_eligible(&self, entry: &GazetteerEntry) -> bool {
        entry.is_in_eras(&self.config.eras)
    }

    /// Bare place names of an entry, in first-seen order, blocklist removed.
    pub fn place_names(&self, entry: &GazetteerEntry) -> Vec<String> {
        let Some(raw) = entry.name.as_deref() else {
            return Vec::new();
        };
        let cleaned: String = strip_tags(raw)
            .chars()
            .filter(|c| !matches!(c, '?' | '[' | ']'))
            .collect();

        let mut names: Vec<String> = Vec::new();
        for variant in place_name_variants(&cleaned) {
            for part in variant.split(',').flat_map(|loc| loc.split('/')) {
                let name = part.trim().to_string();
                if !name.is_empty() && !names.contains(&name) && !self.is_blocked(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Stems of every word of every place name of an eligible entry.
    ///
    /// Ineligible entries yield no stems.
    pub fn derive_stems(&self, entry: &GazetteerEntry) -> Vec<String> {
        if !self.is_eligible(entry) {
            return Vec::new();
        }

        let mut stems: Vec<String> = Vec::new();
        for name in self.place_names(entry) {
            for word in name.split_whitespace() {
                for stem in self.word_stems(word) {
                    if !stems.contains(&stem) {
                        stems.push(stem);
                    }
                }
            }
        }

        // Multi-word names can regenerate a blocked fragment.
        stems.retain(|s| !self.is_blocked(s) && s.chars().count() >= self.config.min_stem_len);
        stems
    }

    /// Cut the word before its last vowel, then once more before each vowel
    /// directly preceding it. A word whose last vowel sits in the first three
    /// letters has no stem.
    pub fn word_stems(&self, word: &str) -> Vec<String> {
        let chars: Vec<char> = word.chars().collect();
        let Some(mut i) = chars.iter().rposition(|c| self.is_vowel(*c)) else {
            return Vec::new();
        };
        if i <= 2 {
            return Vec::new();
        }

        let mut stems = vec![chars[..i].iter().collect::<String>()];
        while i > 1 && self.is_vowel(chars[i - 1]) {
            stems.push(chars[..i - 1].iter().collect());
            i -= 1;
        }
        stems
    }

    fn is_vowel(&self, c: char) -> bool {
        self.config.vowels.contains(c)
    }

    fn is_blocked(&self, fragment: &str) -> bool {
        self.config.blocklist.iter().any(|b| b == fragment)
    }
}
