//! Decoding of scraped inscription fragments into records.
//!
//! The acquisition side hands over each inscription as a flat list of text
//! fragments in page order, with German field labels followed by their values.

use crate::record::InscriptionRecord;

const ID_LABEL: &str = "EDCS-ID:";
const KEYWORDS_LABEL: &str = "Inschriftengattung / Personenstatus:";

/// Decode one inscription. Returns `None` when the fragments carry no id.
pub fn decode_fields(fields: &[String]) -> Option<InscriptionRecord> {
    let id_pos = fields.iter().position(|f| f == ID_LABEL)?;
    let id = fields.get(id_pos + 1)?.trim().to_string();
    if id.is_empty() {
        return None;
    }

    let mut record = InscriptionRecord::new(id);
    let next = |idx: usize, offset: usize| fields.get(idx + offset).cloned();

    for (idx, elem) in fields.iter().enumerate() {
        match elem.as_str() {
            "Publikation:" => record.publication = next(idx, 1),
            "Datierung:" => {
                let end = if id_pos > idx { id_pos } else { fields.len() };
                let (from, to) = parse_date_bounds(&fields[idx..end]);
                record.time_from = from;
                record.time_to = to;
            }
            "Provinz:" => record.province = next(idx, 1),
            "Ort:" => {
                let following = fields.get(idx + 1);
                match following {
                    Some(comment) if comment.starts_with("<!--") => {
                        record.find_lat = parse_coordinate(comment, "latitude=");
                        record.find_long = parse_coordinate(comment, "longitude=");
                        record.findspot = next(idx, 2);
                        record.text = next(idx, 4);
                    }
                    _ => {
                        record.findspot = next(idx, 1);
                        record.text = next(idx, 2);
                    }
                }
            }
            KEYWORDS_LABEL => {
                record.keywords = next(idx, 1);
                if record.text.is_none() && idx > 0 {
                    record.text = fields.get(idx - 1).cloned();
                }
            }
            "Material:" => {
                record.material = next(idx, 1);
                if record.text.is_none() && record.keywords.is_none() && idx > 0 {
                    record.text = fields.get(idx - 1).cloned();
                }
            }
            "Kommentar" | "Kommentar:" => {
                let rest = &fields[idx + 1..];
                if !rest.is_empty() {
                    record.comment = Some(rest.join(" "));
                }
            }
            _ => {}
        }
    }

    Some(record)
}

/// Smallest and largest year found in the dating fragments.
pub fn parse_date_bounds(snippet: &[String]) -> (Option<i32>, Option<i32>) {
    let years: Vec<i32> = snippet.iter().filter_map(|s| parse_year(s)).collect();
    (years.iter().min().copied(), years.iter().max().copied())
}

fn parse_year(fragment: &str) -> Option<i32> {
    let first_digit = fragment.find(|c: char| c.is_ascii_digit())?;
    let digits: String = fragment.chars().filter(|c| c.is_ascii_digit()).collect();
    let value: i32 = digits.parse().ok()?;
    let negative = fragment[..first_digit].ends_with('-');
    Some(if negative { -value } else { value })
}

/// Read the number following `key` in a find-spot link comment.
pub fn parse_coordinate(place: &str, key: &str) -> Option<f64> {
    let start = place.find(key)? + key.len();
    let number: String = place[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    number.parse().ok()
}
