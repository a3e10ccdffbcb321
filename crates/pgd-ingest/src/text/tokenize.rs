//! Word and stem tokenization over marked sentences

use super::sentences::is_abbreviation;
use super::stopwords::is_stopword;
use pgd_common::types::SENTENCE_MARKER;
use rust_stemmers::Stemmer;

/// Shortest token kept in the stems variant
const MIN_STEM_TOKEN_CHARS: usize = 3;

/// Apply `f` to every sentence of marked text and stitch the results back
/// together around the sentence marker.
pub fn map_sentences<F>(marked: &str, f: F) -> String
where
    F: Fn(&str) -> String,
{
    let joiner = format!(" {} ", SENTENCE_MARKER);
    marked
        .split(SENTENCE_MARKER)
        .map(f)
        .collect::<Vec<_>>()
        .join(&joiner)
        .trim()
        .to_string()
}

/// Split one sentence into word tokens; punctuation at either end of a word
/// becomes its own token, everything else is left as written.
pub fn words(sentence: &str) -> String {
    let mut tokens: Vec<&str> = Vec::new();
    for chunk in sentence.split_whitespace() {
        split_chunk(chunk, &mut tokens);
    }
    tokens.join(" ")
}

fn split_chunk<'a>(chunk: &'a str, tokens: &mut Vec<&'a str>) {
    let is_punct = |c: char| c.is_ascii_punctuation();
    if is_abbreviation(chunk) && !chunk.starts_with(is_punct) {
        tokens.push(chunk);
        return;
    }

    let (Some(core_start), Some(core_end)) = (
        chunk.find(|c: char| !is_punct(c)),
        chunk.rfind(|c: char| !is_punct(c)),
    ) else {
        // all punctuation, e.g. "--" or "..."
        tokens.push(chunk);
        return;
    };
    let core_end = core_end + chunk[core_end..].chars().next().map_or(1, char::len_utf8);

    tokens.extend(chunk[..core_start].split_inclusive(|_: char| true));
    tokens.push(&chunk[core_start..core_end]);
    tokens.extend(chunk[core_end..].split_inclusive(|_: char| true));
}

/// Normalize one sentence for bag-of-words use: lowercase, punctuation and
/// digits removed, stopwords and very short tokens dropped, then stemmed.
pub fn stems(sentence: &str, stemmer: &Stemmer) -> String {
    let cleaned: String = sentence
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .filter(|c| !c.is_ascii_digit())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| !is_stopword(word))
        .filter(|word| word.chars().count() >= MIN_STEM_TOKEN_CHARS)
        .map(|word| stemmer.stem(word).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
