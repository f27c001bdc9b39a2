use anyhow::{Context, Result};
use regex::Regex;

use crate::lexicon::{Lexicon, in_table};
use crate::names::{NameAuthority, extract_names};
use crate::schema::{Demographics, Gender, LegalStatus, SignalReadings};

/// Gender signals that take part in the combination rule, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Keywords,
    Filiation,
    Servile,
    FirstWord,
}

pub const COMBINED_SIGNALS: [Signal; 4] = [
    Signal::Keywords,
    Signal::Filiation,
    Signal::Servile,
    Signal::FirstWord,
];

/// Decision table for the combined gender: the first row whose gender is
/// reported by any signal wins. Male is checked before female across all
/// signals; this ordering mirrors the measured accuracy of the signals and
/// must not change.
const DECISION_TABLE: [Gender; 2] = [Gender::Male, Gender::Female];

pub fn combine(readings: &[Option<Gender>]) -> Gender {
    DECISION_TABLE
        .into_iter()
        .find(|wanted| readings.contains(&Some(*wanted)))
        .unwrap_or(Gender::Unknown)
}

/// Inputs shared by all signals of one record.
struct SignalInput<'a> {
    words: Vec<&'a str>,
    keywords: &'a str,
    names: &'a [String],
}

pub struct DemographicClassifier {
    lexicon: Lexicon,
    funerary: Regex,
    origin: Regex,
}

impl DemographicClassifier {
    pub fn new(lexicon: Lexicon) -> Result<Self> {
        let funerary = Regex::new(&lexicon.funerary_formulas.join("|"))
            .context("Invalid funerary formula pattern")?;
        let origin = Regex::new(&lexicon.origin_patterns.join("|"))
            .context("Invalid origin vocabulary pattern")?;
        Ok(Self {
            lexicon,
            funerary,
            origin,
        })
    }

    /// Classify one record from its cleaned text and tag field.
    ///
    /// Missing text yields unknown for every text-based signal.
    pub fn classify(
        &self,
        cleantext: Option<&str>,
        keywords: &str,
        authority: &NameAuthority,
    ) -> Demographics {
        let text = cleantext.unwrap_or("");
        let names = cleantext
            .map(|t| extract_names(t, authority, &self.lexicon))
            .unwrap_or_default();
        let ctx = SignalInput {
            words: text.split_whitespace().collect(),
            keywords,
            names: &names,
        };

        let readings: Vec<Option<Gender>> = COMBINED_SIGNALS
            .iter()
            .map(|signal| self.evaluate(*signal, &ctx))
            .collect();
        let signals = SignalReadings {
            gender_keywords: readings[0],
            gender_filiation: readings[1],
            gender_servile: readings[2],
            gender_first_word: readings[3],
            gender_origin_name: self.origin_name_gender(&ctx.words),
        };

        let name = names.join(", ");
        let lower = text.to_lowercase();

        Demographics {
            contains_name: name.len() > 2,
            name,
            gender: combine(&readings),
            signals,
            legal_status: self.legal_status(&ctx.words),
            slave: self.any_word_in(&ctx.words, &self.lexicon.slave_forms),
            freed: self.any_word_in(&ctx.words, &self.lexicon.freed_forms),
            freeborn: self.any_word_in(&ctx.words, &self.lexicon.freeborn_forms),
            funerary: keywords.contains(&self.lexicon.funerary_tag)
                || (cleantext.is_some() && self.funerary.is_match(&lower)),
            location_indicator: cleantext.is_some() && self.origin.is_match(&lower),
        }
    }

    fn evaluate(&self, signal: Signal, ctx: &SignalInput<'_>) -> Option<Gender> {
        let lex = &self.lexicon;
        match signal {
            Signal::Keywords => self.keyword_gender(ctx),
            Signal::Filiation => {
                first_table_hit(&ctx.words, &lex.filiation_female, &lex.filiation_male)
            }
            Signal::Servile => first_table_hit(&ctx.words, &lex.servile_female, &lex.servile_male),
            Signal::FirstWord => ctx
                .words
                .iter()
                .filter(|w| self.is_capitalized_word(w) && w.is_ascii())
                .find_map(|w| self.suffix_gender(w)),
        }
    }

    /// Tag keywords OR-ed with the gender of the accepted names.
    fn keyword_gender(&self, ctx: &SignalInput<'_>) -> Option<Gender> {
        let by_names = self.names_gender(ctx.names);
        let male = ctx.keywords.contains(&self.lexicon.male_keyword) || by_names == Some(Gender::Male);
        let female =
            ctx.keywords.contains(&self.lexicon.female_keyword) || by_names == Some(Gender::Female);
        match (male, female) {
            (true, false) => Some(Gender::Male),
            (false, true) => Some(Gender::Female),
            _ => None,
        }
    }

    /// Majority gender of the accepted names; one side needs at least twice
    /// the count of the other when both occur.
    fn names_gender(&self, names: &[String]) -> Option<Gender> {
        let mut male = 0usize;
        let mut female = 0usize;
        for name in names {
            let exception = self.lexicon.is_masculine_name(name);
            if name.ends_with("us") || exception || (name.ends_with("is") && !name.ends_with("ensis"))
            {
                male += 1;
            } else if name.ends_with('a') || name.ends_with("oe") {
                female += 1;
            }
        }

        match (male, female) {
            (0, 0) => None,
            (_, 0) => Some(Gender::Male),
            (0, _) => Some(Gender::Female),
            (m, f) if m >= 2 * f => Some(Gender::Male),
            (m, f) if f >= 2 * m => Some(Gender::Female),
            _ => None,
        }
    }

    fn is_capitalized_word(&self, word: &str) -> bool {
        let mut chars = word.chars();
        matches!(
            (chars.next(), chars.next()),
            (Some(first), Some(second)) if first.is_uppercase() && second.is_lowercase()
        ) && word.chars().count() > 2
            && !self.lexicon.is_stop_word(word)
    }

    fn suffix_gender(&self, word: &str) -> Option<Gender> {
        let lex = &self.lexicon;
        if lex.is_masculine_name(word) || lex.masculine_suffixes.iter().any(|s| word.ends_with(s.as_str())) {
            Some(Gender::Male)
        } else if lex.feminine_suffixes.iter().any(|s| word.ends_with(s.as_str())) {
            Some(Gender::Female)
        } else {
            None
        }
    }

    /// Gender of the nearest name-like word before the first origin word.
    fn origin_name_gender(&self, words: &[&str]) -> Option<Gender> {
        let start = words.iter().position(|w| self.origin.is_match(w))?;
        let name = words[..start]
            .iter()
            .rev()
            .find(|w| self.is_capitalized_word(w))?;
        self.suffix_gender(name)
    }

    /// First status word in reading order decides; the slave table is
    /// consulted before the freed and freeborn tables for each word.
    fn legal_status(&self, words: &[&str]) -> LegalStatus {
        let lex = &self.lexicon;
        for word in words {
            if in_table(&lex.slave_forms, word) {
                return LegalStatus::Slave;
            }
            if in_table(&lex.freed_forms, word) {
                return LegalStatus::Freed;
            }
            if in_table(&lex.freeborn_forms, word) {
                return LegalStatus::Free;
            }
        }
        LegalStatus::Unknown
    }

    fn any_word_in(&self, words: &[&str], table: &[String]) -> bool {
        words.iter().any(|w| in_table(table, w))
    }
}

/// First word found in either table decides; within a word the feminine
/// table is checked first.
fn first_table_hit(words: &[&str], female: &[String], male: &[String]) -> Option<Gender> {
    words.iter().find_map(|word| {
        if in_table(female, word) {
            Some(Gender::Female)
        } else if in_table(male, word) {
            Some(Gender::Male)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> DemographicClassifier {
        DemographicClassifier::new(Lexicon::default()).unwrap()
    }

    fn authority() -> NameAuthority {
        NameAuthority::from_headwords(["Aurelia", "Marcus", "Iulia", "Gaius", "Agrippa"])
    }

    fn classify(text: &str, keywords: &str) -> Demographics {
        classifier().classify(Some(text), keywords, &authority())
    }

    #[test]
    fn test_combine_male_first() {
        assert_eq!(combine(&[Some(Gender::Female), Some(Gender::Male)]), Gender::Male);
        assert_eq!(combine(&[None, Some(Gender::Female), None]), Gender::Female);
        assert_eq!(combine(&[None, None]), Gender::Unknown);
        assert_eq!(combine(&[]), Gender::Unknown);
    }

    #[test]
    fn test_keyword_female_filiation_male_is_male() {
        let d = classify("hic situs est filius pius", "tituli sepulcrales; mulieres");
        assert_eq!(d.signals.gender_keywords, Some(Gender::Female));
        assert_eq!(d.signals.gender_filiation, Some(Gender::Male));
        assert_eq!(d.gender, Gender::Male);
    }

    #[test]
    fn test_keywords_conflict_is_indeterminate() {
        let d = classify("hic sita est", "viri; mulieres");
        assert_eq!(d.signals.gender_keywords, None);
    }

    #[test]
    fn test_names_feed_keyword_signal() {
        let d = classify("Iuliae coniugi", "");
        assert_eq!(d.name, "Iulia");
        assert!(d.contains_name);
        assert_eq!(d.signals.gender_keywords, Some(Gender::Female));

        // Agrippa ends in -a but is masculine
        let d = classify("Agrippa fecit", "");
        assert_eq!(d.signals.gender_keywords, Some(Gender::Male));
    }

    #[test]
    fn test_name_ratio() {
        let c = classifier();
        let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(c.names_gender(&names(&["Marcus", "Gaius", "Iulia"])), Some(Gender::Male));
        assert_eq!(c.names_gender(&names(&["Marcus", "Iulia"])), None);
        assert_eq!(c.names_gender(&names(&["Iulia", "Aurelia", "Marcus"])), Some(Gender::Female));
        assert_eq!(c.names_gender(&names(&["Emeritensis"])), None);
        assert_eq!(c.names_gender(&[]), None);
    }

    #[test]
    fn test_first_capitalized_word() {
        assert_eq!(classify("Dis Manibus Aureliae", "").signals.gender_first_word, Some(Gender::Female));
        assert_eq!(classify("D M Primo", "").signals.gender_first_word, Some(Gender::Male));
        // Greek tokens are skipped, the stoplist too
        assert_eq!(
            classify("Θεοῖς Manibus Nerva", "").signals.gender_first_word,
            Some(Gender::Male)
        );
        assert_eq!(classify("d m s", "").signals.gender_first_word, None);
    }

    #[test]
    fn test_servile_feminine_checked_first_within_word() {
        let d = classify("Felix servus Primae serva", "");
        assert_eq!(d.signals.gender_servile, Some(Gender::Male));
        let d = classify("servae", "");
        assert_eq!(d.signals.gender_servile, Some(Gender::Female));
    }

    #[test]
    fn test_legal_status_first_match() {
        assert_eq!(classify("Marci filius servus", "").legal_status, LegalStatus::Free);
        assert_eq!(classify("Marci servus filius", "").legal_status, LegalStatus::Slave);
        assert_eq!(classify("liberta et filia", "").legal_status, LegalStatus::Freed);
        assert_eq!(classify("Libertas", "").legal_status, LegalStatus::Unknown);
        assert_eq!(classify("SERVVS SERVO", "").legal_status, LegalStatus::Slave);
    }

    #[test]
    fn test_status_flags() {
        let d = classify("Felix servus et liberta", "");
        assert!(d.slave);
        assert!(d.freed);
        assert!(!d.freeborn);
    }

    #[test]
    fn test_funerary() {
        assert!(classify("Dis Manibus sacrum", "").funerary);
        assert!(classify("vixit annis XX", "").funerary);
        assert!(classify("hic situs est", "").funerary);
        assert!(classify("Iovi Optimo Maximo", "tituli sepulcrales").funerary);
        assert!(!classify("Iovi Optimo Maximo", "tituli sacri").funerary);
    }

    #[test]
    fn test_origin_vocabulary() {
        let d = classify("Aureliae Emeritensi coniugi", "");
        assert!(d.location_indicator);
        assert_eq!(d.signals.gender_origin_name, Some(Gender::Female));

        let d = classify("Marco domo Roma", "");
        assert!(d.location_indicator);
        assert_eq!(d.signals.gender_origin_name, Some(Gender::Male));

        assert!(!classify("Iovi sacrum", "").location_indicator);
    }

    #[test]
    fn test_gn_words_are_not_origin_vocabulary() {
        for text in ["matri dignae posuit", "signum posuit", "regnum"] {
            assert!(!classify(text, "").location_indicator, "{:?}", text);
        }
        let d = classify("Marco benigno patri", "");
        assert!(!d.location_indicator);
        assert_eq!(d.signals.gender_origin_name, None);

        // -ianus forms are still caught by the -anus paradigm
        assert!(classify("Marco Hadrianus", "").location_indicator);
    }

    #[test]
    fn test_missing_text_is_unknown() {
        let d = classifier().classify(None, "", &authority());
        assert_eq!(d, Demographics::unknown());
    }
}
