use serde::{Deserialize, Serialize};

/// Fixed word tables and formulas used by the demographic classifier.
///
/// Built once at pipeline start and passed into the classifier; nothing in
/// this crate reads tables from global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Capitalized formula words that are never personal names.
    pub stop_words: Vec<String>,
    /// Names ending in `-a` that belong to men.
    pub masculine_names: Vec<String>,
    /// Endings that mark the first capitalized word as masculine.
    pub masculine_suffixes: Vec<String>,
    /// Endings that mark the first capitalized word as feminine.
    pub feminine_suffixes: Vec<String>,

    /// Substring of the tag field marking a male group reference.
    pub male_keyword: String,
    /// Substring of the tag field marking a female group reference.
    pub female_keyword: String,

    pub filiation_male: Vec<String>,
    pub filiation_female: Vec<String>,
    pub servile_male: Vec<String>,
    pub servile_female: Vec<String>,

    /// Legal-status tables, full paradigms.
    pub slave_forms: Vec<String>,
    pub freed_forms: Vec<String>,
    pub freeborn_forms: Vec<String>,

    /// Substring of the tag field marking a funerary text.
    pub funerary_tag: String,
    /// Regex alternatives matched against the lower-cased cleaned text.
    pub funerary_formulas: Vec<String>,
    /// Regex alternatives for origin vocabulary, matched per word.
    pub origin_patterns: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            stop_words: owned(&["Dis", "Manibus"]),
            masculine_names: owned(&["Agrippa", "Aquila", "Caracalla", "Nerva", "Scaevola", "Seneca"]),
            masculine_suffixes: owned(&["us", "os", "is", "er", "i", "o"]),
            feminine_suffixes: owned(&["ae", "a"]),

            male_keyword: "vir".to_string(),
            female_keyword: "mulier".to_string(),

            filiation_male: owned(&[
                "filius", "fili", "filii", "filio", "filium", "filiom", "filiorum", "filios",
            ]),
            filiation_female: owned(&[
                "filia", "filiae", "filiai", "filiam", "filiad", "filiarum", "filiabus", "filias",
            ]),
            // servis is shared by both genders and left out
            servile_male: owned(&[
                "servus", "servi", "servo", "servum", "serve", "servorum", "servos", "servom",
            ]),
            servile_female: owned(&[
                "serva", "servae", "servam", "servarum", "servabus", "servas", "servai",
            ]),

            slave_forms: owned(&[
                "servus", "servi", "servo", "servum", "servom", "servorum", "servis", "servos",
                "serva", "servae", "servai", "servam", "servarum", "servas", "servabus",
            ]),
            // libertas is the abstract noun, not a status
            freed_forms: owned(&[
                "libertus", "liberti", "liberto", "libertum", "libertom", "liberte", "libertorum",
                "libertis", "libertos", "liberta", "libertae", "libertai", "libertam", "libertad",
                "libertarum", "libertabus",
            ]),
            freeborn_forms: owned(&[
                "filia", "filiae", "filiai", "filiam", "filiad", "filiarum", "filiabus", "filias",
                "filius", "fili", "filii", "filio", "filium", "filiom", "filiorum", "filios",
            ]),

            funerary_tag: "sepulcrales".to_string(),
            funerary_formulas: owned(&[
                r"faciend(?:[a-z]+) curav(?:[a-z]+)",
                r"dis manibus",
                r"sit(?:[a-z]+) est",
                r"bene merenti",
                r"vixit",
                r"ex testamento",
                r"sit tibi terra levis",
                r"requiesc[a-z]t",
            ]),
            origin_patterns: owned(&[
                r"\b\w*ens(?:is|i|em|e|es|ium|ia|ibus)\b",
                r"\b\w*itan(?:us|i|o|um|a|ae|am|is|os|as|orum|arum)\b",
                r"\b\w*an(?:us|i|o|um|a|ae|am|orum|os|is|arum|as)\b",
                r"\btrib(?:us|ui|um|u|uum|ibus)\b",
                r"\bciv(?:is|i|em|e|es|ium|ibus)\b",
                r"\bdomo\b",
                r"\borigo\b",
                r"\bnatione\b",
                r"\bcoloni(?:a|ae|am|arum|is|as)\b",
            ]),
        }
    }
}

impl Lexicon {
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.iter().any(|w| w == word)
    }

    pub fn is_masculine_name(&self, word: &str) -> bool {
        self.masculine_names.iter().any(|w| w == word)
    }
}

/// Case-insensitive exact membership of `word` in `table`.
pub fn in_table(table: &[String], word: &str) -> bool {
    table.iter().any(|form| form.eq_ignore_ascii_case(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_exclude_ambiguous_forms() {
        let lex = Lexicon::default();
        assert!(!in_table(&lex.freed_forms, "libertas"));
        assert!(!in_table(&lex.servile_male, "servis"));
        assert!(!in_table(&lex.servile_female, "servis"));
        assert!(in_table(&lex.slave_forms, "servis"));
    }

    #[test]
    fn test_case_insensitive_membership() {
        let lex = Lexicon::default();
        assert!(in_table(&lex.freed_forms, "LIBERTA"));
        assert!(in_table(&lex.freeborn_forms, "Filius"));
        assert!(!in_table(&lex.freeborn_forms, "filiusque"));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let lex: Lexicon = serde_json::from_str(r#"{"stop_words": ["Dis", "Manibus", "Sacrum"]}"#).unwrap();
        assert!(lex.is_stop_word("Sacrum"));
        assert_eq!(lex.male_keyword, "vir");
    }
}
