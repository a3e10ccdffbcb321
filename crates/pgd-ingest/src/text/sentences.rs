//! Rule-based sentence boundary detection

use pgd_common::types::SENTENCE_MARKER;
use pgd_common::{PgdError, Result};
use regex::Regex;

/// Abbreviations that end in a period without ending the sentence
const ABBREVIATIONS: &[&str] = &[
    "al.", "approx.", "ca.", "cf.", "cv.", "fig.", "figs.", "no.", "sp.", "spp.", "ssp.", "var.",
    "vs.",
];

/// `e.g.`, `i.e.`, `A.`: single letters each followed by a period. A lone
/// lowercase letter (`allele b.`) is a word, not an initial.
fn is_initialism(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    match chars.len() {
        2 => chars[0].is_uppercase() && chars[1] == '.',
        n => {
            n > 2
                && n % 2 == 0
                && chars
                    .chunks(2)
                    .all(|pair| pair[0].is_alphabetic() && pair[1] == '.')
        },
    }
}

/// Whether a whitespace-delimited token is an abbreviation, ignoring any
/// opening brackets or quotes in front of it.
pub(crate) fn is_abbreviation(token: &str) -> bool {
    let word = token.trim_start_matches(|c: char| !c.is_alphanumeric());
    if word.is_empty() {
        return false;
    }
    let lower = word.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str()) || is_initialism(word)
}

/// Splits descriptions into sentences.
///
/// Semicolons are read as sentence ends. A run of `.`, `!` or `?` (plus any
/// closing quotes or brackets) followed by whitespace ends a sentence unless
/// the word it closes is an abbreviation.
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    boundary: Regex,
}

impl SentenceSplitter {
    pub fn new() -> Result<Self> {
        let boundary = Regex::new(r#"[.!?]+["')\]]*\s+"#)
            .map_err(|e| PgdError::parse(format!("Invalid sentence boundary pattern: {}", e)))?;
        Ok(Self { boundary })
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let text = text.replace(';', ".");
        let mut sentences = Vec::new();
        let mut start = 0;

        for candidate in self.boundary.find_iter(&text) {
            let head = text[start..candidate.end()].trim_end();
            let last_word = head.rsplit(char::is_whitespace).next().unwrap_or_default();
            if is_abbreviation(last_word) {
                continue;
            }
            push_trimmed(&mut sentences, head);
            start = candidate.end();
        }
        push_trimmed(&mut sentences, &text[start..]);
        sentences
    }

    /// Prefix every sentence with the sentence marker and join them with
    /// spaces: `"[SENT] Dwarf. [SENT] Pale leaves."`
    pub fn mark(&self, text: &str) -> String {
        self.split(text)
            .iter()
            .map(|sentence| format!("{} {}", SENTENCE_MARKER, sentence))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}
