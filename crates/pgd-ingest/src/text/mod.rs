//! Phenotype description preprocessing
//!
//! Each description yields three derived columns, all sharing the same
//! sentence structure:
//!
//! | column | content |
//! |--------|---------|
//! | `text_tokenized_sents` | `[SENT] Dwarf. [SENT] Pale leaves.` |
//! | `text_tokenized_words` | `[SENT] Dwarf . [SENT] Pale leaves .` |
//! | `text_tokenized_stems` | `[SENT] dwarf [SENT] pale leav` |
//!
//! Semicolons count as sentence ends. Rows without text leave all three
//! columns empty.

pub mod sentences;
pub mod stopwords;
pub mod tokenize;

pub use sentences::SentenceSplitter;

use crate::progress::create_progress_bar;
use pgd_common::types::GeneRecord;
use pgd_common::Result;
use rust_stemmers::{Algorithm, Stemmer};
use tracing::info;

/// Derived text columns for one description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedText {
    pub sents: String,
    pub words: String,
    pub stems: String,
}

/// Sentence splitter plus English stemmer, built once per run
pub struct TextPreprocessor {
    splitter: SentenceSplitter,
    stemmer: Stemmer,
}

impl TextPreprocessor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            splitter: SentenceSplitter::new()?,
            stemmer: Stemmer::create(Algorithm::English),
        })
    }

    pub fn process(&self, text: &str) -> TokenizedText {
        if text.trim().is_empty() {
            return TokenizedText::default();
        }
        let sents = self.splitter.mark(text);
        let words = tokenize::map_sentences(&sents, tokenize::words);
        let stems = tokenize::map_sentences(&sents, |s| tokenize::stems(s, &self.stemmer));
        TokenizedText { sents, words, stems }
    }

    /// Fill the tokenized columns of every record in place.
    ///
    /// Returns how many records carried text.
    pub fn tokenize_records(&self, records: &mut [GeneRecord], show_progress: bool) -> usize {
        let pb = create_progress_bar(records.len() as u64, "Tokenizing descriptions", show_progress);
        let mut with_text = 0;

        for record in records.iter_mut() {
            let tokenized = self.process(&record.text_unprocessed);
            if !tokenized.sents.is_empty() {
                with_text += 1;
            }
            record.text_tokenized_sents = tokenized.sents;
            record.text_tokenized_words = tokenized.words;
            record.text_tokenized_stems = tokenized.stems;
            pb.inc(1);
        }

        pb.finish_and_clear();
        info!(records = records.len(), with_text, "Tokenized descriptions");
        with_text
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_process_builds_all_variants() {
        let pre = TextPreprocessor::new().unwrap();
        let out = pre.process("Dwarf; pale leaves.");
        assert_eq!(out.sents, "[SENT] Dwarf. [SENT] pale leaves.");
        assert_eq!(out.words, "[SENT] Dwarf . [SENT] pale leaves .");
        assert_eq!(out.stems, "[SENT] dwarf [SENT] pale leav");
    }

    #[test]
    fn test_empty_text_leaves_columns_empty() {
        let pre = TextPreprocessor::new().unwrap();
        assert_eq!(pre.process("  "), TokenizedText::default());
    }

    #[test]
    fn test_tokenize_records() {
        let pre = TextPreprocessor::new().unwrap();
        let mut records = vec![
            GeneRecord {
                text_unprocessed: "Seeds shrivel.".to_string(),
                ..Default::default()
            },
            GeneRecord::default(),
        ];
        assert_eq!(pre.tokenize_records(&mut records, false), 1);
        assert_eq!(records[0].text_tokenized_words, "[SENT] Seeds shrivel .");
        assert!(records[1].text_tokenized_stems.is_empty());
    }
}
