use anyhow::{Context, Result};
use regex::Regex;

/// Turns editorially marked-up transcriptions into plain word streams.
///
/// Cleaning is a pure function of the input and idempotent: the output only
/// holds letters, single spaces and `[n]` lacuna markers, none of which are
/// touched by a second pass.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    /// Runs of letters and whitespace, or a one-digit lacuna marker.
    notation: Regex,
    whitespace: Regex,
}

impl TextNormalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            notation: Regex::new(r"\[[0-9]\]|[\p{Alphabetic}\s]+")
                .context("Invalid notation pattern")?,
            whitespace: Regex::new(r"\s+").context("Invalid whitespace pattern")?,
        })
    }

    /// Clean a raw transcription.
    pub fn normalize(&self, raw: &str) -> String {
        let corrected = apply_corrections(raw);
        let trimmed = remove_superfluous(&corrected);
        let stripped = self.strip_notation(&trimmed);
        self.collapse_whitespace(&stripped)
    }

    /// Clean an optional transcription; absent text stays absent.
    pub fn normalize_opt(&self, raw: Option<&str>) -> Option<String> {
        raw.map(|text| self.normalize(text))
    }

    /// Keep whitespace, letters and `[d]` lacuna markers; drop everything else.
    pub fn strip_notation(&self, text: &str) -> String {
        self.notation.find_iter(text).map(|m| m.as_str()).collect()
    }

    pub fn collapse_whitespace(&self, text: &str) -> String {
        self.whitespace.replace_all(text, " ").trim().to_string()
    }
}

/// Replace every `<engraved=corrected>` span with the lower-cased corrected
/// reading. Spans without `=` are left as they are.
pub fn apply_corrections(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        // Unclosed span: keep the remainder untouched.
        let Some(close) = after.find('>') else {
            break;
        };
        let span = &after[..close];
        out.push_str(&rest[..open]);
        match span.find('=') {
            Some(eq) => out.push_str(&span[eq + 1..].to_lowercase()),
            None => out.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

/// Drop `{...}` spans (letters the editor marks as superfluous).
pub fn remove_superfluous(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        out.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }

    out.push_str(rest);
    out
}

/// Remove `<...>` tags. An unclosed tag ends the scan.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        out.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }

    out.push_str(rest);
    out
}

/// Resolve parentheticals in a place name.
///
/// `(...)` is an omission and is deleted. A parenthetical preceded by
/// whitespace is an optional word and is deleted. Anything else is a spelling
/// variant: the result then holds two readings, without and with the
/// parenthesized letters, in that order.
pub fn place_name_variants(name: &str) -> Vec<String> {
    let mut without = String::with_capacity(name.len());
    let mut with = String::with_capacity(name.len());
    let mut has_variant = false;
    let mut rest = name;

    while let Some(open) = rest.find('(') {
        let Some(len) = rest[open + 1..].find(')') else {
            break;
        };
        let before = &rest[..open];
        let inner = &rest[open + 1..open + 1 + len];
        without.push_str(before);
        with.push_str(before);

        let optional_word = with.chars().last().is_some_and(char::is_whitespace);
        if inner != "..." && !optional_word {
            has_variant = true;
            with.push_str(inner);
        }
        rest = &rest[open + len + 2..];
    }

    without.push_str(rest);
    with.push_str(rest);

    let mut variants = vec![tidy_place_name(&without)];
    if has_variant {
        variants.push(tidy_place_name(&with));
    }
    variants
}

fn tidy_place_name(name: &str) -> String {
    let cleaned: String = name.chars().filter(|c| *c != '(' && *c != ')').collect();
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(" ,", ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(input: &str) -> String {
        TextNormalizer::new().unwrap().normalize(input)
    }

    #[test]
    fn test_correction_is_replaced_in_place() {
        assert_eq!(norm("<ABC=def>"), "def");
        assert_eq!(norm("fe<C=G>it"), "fegit");
        assert_eq!(norm("A<B=C>D E<F=GH>I"), "AcD EghI");
    }

    #[test]
    fn test_correction_without_equals_keeps_letters() {
        assert_eq!(norm("a<bc>d"), "abcd");
    }

    #[test]
    fn test_superfluous_letters_removed() {
        assert_eq!(norm("a{xyz}b"), "ab");
        assert_eq!(norm("vix{s}it annis"), "vixit annis");
    }

    #[test]
    fn test_lacuna_markers_preserved() {
        assert_eq!(norm("AB[3]CD"), "AB[3]CD");
        assert_eq!(norm("[[3]] [12] [a]"), "[3] a");
    }

    #[test]
    fn test_inscriptionese_stripped() {
        assert_eq!(
            norm("D(is) M(anibus) / Aureliae [Ma]ximae / ann(orum) XXV"),
            "Dis Manibus Aureliae Maximae annorum XXV"
        );
        assert_eq!(norm("  hic   situs 3 est "), "hic situs est");
    }

    #[test]
    fn test_unbalanced_markup_does_not_panic() {
        assert_eq!(norm("abc <DE=f"), "abc DEf");
        assert_eq!(norm("abc {de"), "abc de");
        assert_eq!(norm("<"), "");
        assert_eq!(norm("{"), "");
        assert_eq!(norm("a>b=c}"), "abc");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "D M <ABC=def> {x}Aur[3]eliae / Emerit(ensi) coniugi",
            "Θεοῖς καταχθονίοις <Ε=Σ>",
            "[[5]] vixit a(nnos) <L=I>II {{",
            "",
        ];
        for s in samples {
            let once = norm(s);
            assert_eq!(norm(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_notation_steps() {
        let normalizer = TextNormalizer::new().unwrap();
        assert_eq!(normalizer.strip_notation("ann(orum) XXV / [[3]] [12]"), "annorum XXV  [3] ");
        assert_eq!(normalizer.strip_notation("Aur[5]eliae"), "Aur[5]eliae");
        assert_eq!(normalizer.collapse_whitespace("  hic \t situs\n est "), "hic situs est");
        assert_eq!(normalizer.collapse_whitespace(""), "");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<b>Emerita</b> Augusta"), "Emerita Augusta");
        assert_eq!(strip_tags("Emerita <i"), "Emerita <i");
    }

    #[test]
    fn test_parenthetical_policy() {
        assert_eq!(place_name_variants("Emerita"), vec!["Emerita"]);
        assert_eq!(place_name_variants("Emerita (...)"), vec!["Emerita"]);
        assert_eq!(place_name_variants("Colonia (Augusta) Emerita"), vec!["Colonia Emerita"]);
        assert_eq!(
            place_name_variants("Aquitani(c)a"),
            vec!["Aquitania", "Aquitanica"]
        );
        assert_eq!(
            place_name_variants("Lat(t)ium (Vetus), Latinum"),
            vec!["Latium, Latinum", "Lattium, Latinum"]
        );
    }

    #[test]
    fn test_unclosed_parenthesis() {
        assert_eq!(place_name_variants("Emerita (Augusta"), vec!["Emerita Augusta"]);
    }
}
