use std::collections::HashSet;

use crate::lexicon::Lexicon;
use crate::normalizer::strip_tags;

/// Praenomina and frequent nomina, added to every authority built from
/// annotated headwords (the prosopography lists them only abbreviated).
const SEED_NAMES: [&str; 29] = [
    "Aulus", "Appius", "Gaius", "Gnaeus", "Decimus", "Lucius", "Marcus", "Manius", "Publius",
    "Quintus", "Sergius", "Sextus", "Spurius", "Titus", "Tiberius", "Aelia", "Aelius", "Aurelia",
    "Aurelius", "Claudia", "Claudius", "Flavia", "Flavius", "Iulia", "Iulius", "Valeria",
    "Valerius", "Caius", "Cnaeus",
];

/// Editorial fragments deleted from annotated headwords.
const HEADWORD_NOISE: [&str; 8] = ["...", "..", "(", ")", "[", "]", "-", "?"];

/// Attested personal names (nominative headwords, case-sensitive).
/// Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct NameAuthority {
    names: HashSet<String>,
}

impl NameAuthority {
    /// Build from a plain list of headwords.
    pub fn from_headwords<I, S>(headwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = headwords
            .into_iter()
            .map(|h| h.as_ref().trim().to_string())
            .filter(|h| !h.is_empty())
            .collect();
        Self { names }
    }

    /// Build from annotated prosopographical entries such as
    /// `"<i>C.</i> Iulius (?) Caesar vel Caesarion"`.
    pub fn from_annotated<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: HashSet<String> = SEED_NAMES.iter().map(|n| n.to_string()).collect();

        for entry in entries {
            let mut cleaned = strip_tags(entry.as_ref());
            for noise in HEADWORD_NOISE {
                cleaned = cleaned.replace(noise, "");
            }
            let cleaned = cleaned.replace("vel", " ");

            for part in cleaned.split_whitespace() {
                let starts_upper = part.chars().next().is_some_and(char::is_uppercase);
                if starts_upper && !part.ends_with('.') && part.chars().count() > 3 {
                    names.insert(part.to_string());
                }
            }
        }

        Self { names }
    }

    pub fn contains(&self, lemma: &str) -> bool {
        self.names.contains(lemma)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Whether `word` looks like a personal name: longer than two letters,
/// capital then lower-case, pure ASCII, not a formula word.
pub fn is_name_candidate(word: &str, lexicon: &Lexicon) -> bool {
    let mut chars = word.chars();
    let (Some(first), Some(second)) = (chars.next(), chars.next()) else {
        return false;
    };
    word.is_ascii()
        && word.len() > 2
        && first.is_uppercase()
        && second.is_lowercase()
        && !lexicon.is_stop_word(word)
}

/// Naive nominative singular: `-ae` drops its final letter, final `-i`/`-o`
/// become `-us`.
pub fn lemmatize(word: &str) -> String {
    if word.ends_with("ae") {
        word[..word.len() - 1].to_string()
    } else if word.ends_with('i') || word.ends_with('o') {
        format!("{}us", &word[..word.len() - 1])
    } else {
        word.to_string()
    }
}

/// Accepted names of a cleaned text, lemmatized, in first-seen order.
pub fn extract_names(cleantext: &str, authority: &NameAuthority, lexicon: &Lexicon) -> Vec<String> {
    cleantext
        .split_whitespace()
        .filter(|w| is_name_candidate(w, lexicon))
        .map(lemmatize)
        .filter(|lemma| authority.contains(lemma))
        .collect()
}
