//! Common types used across PGD
//!
//! Identifier, gene-model and annotation lists are pipe (`|`) delimited on
//! disk and held as `Vec<String>` in memory. Splitting trims every item and
//! drops empty ones, so an empty cell is exactly an empty list.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Delimiter used for every list-valued column
pub const BAR: char = '|';

/// Marker placed in front of every sentence of a tokenized description
pub const SENTENCE_MARKER: &str = "[SENT]";

// ============================================================================
// Pipe-delimited list helpers
// ============================================================================

/// Split a pipe-delimited cell into trimmed, non-empty items.
///
/// ```
/// use pgd_common::types::bar_split;
///
/// assert_eq!(bar_split(" a|b ||c"), vec!["a", "b", "c"]);
/// assert!(bar_split("").is_empty());
/// ```
pub fn bar_split(raw: &str) -> Vec<String> {
    raw.split(BAR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join items back into a pipe-delimited cell.
pub fn bar_join<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("|")
}

/// Concatenate several lists (or pipe-delimited cells) into one list,
/// keeping the first occurrence of each item.
pub fn bar_concat<I, S>(cells: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for cell in cells {
        for item in bar_split(cell.as_ref()) {
            if seen.insert(item.clone()) {
                out.push(item);
            }
        }
    }
    out
}

/// Serde adapter mapping a `Vec<String>` to a single pipe-delimited string
pub mod bar_list {
    use super::{bar_join, bar_split};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(items: &[String], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&bar_join(items))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(bar_split).unwrap_or_default())
    }
}

/// Serde adapter treating a missing cell as an empty string
mod empty_string {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }
}

// ============================================================================
// Reshaped input rows
// ============================================================================

/// Columns every reshaped source file must carry (in any order)
pub const RESHAPED_COLUMNS: [&str; 10] = [
    "species_name",
    "species_code",
    "unique_gene_identifiers",
    "other_gene_identifiers",
    "gene_models",
    "text_unprocessed",
    "annotations",
    "reference_name",
    "reference_link",
    "reference_file",
];

/// One record contributed by a single upstream source.
///
/// `unique_gene_identifiers` must each refer to this gene only;
/// `other_gene_identifiers` may be ambiguous aliases; `gene_models` are the
/// systematic locus names, in spirit a subset of the unique identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneRow {
    #[serde(default, deserialize_with = "empty_string::deserialize")]
    pub species_name: String,

    #[serde(default, deserialize_with = "empty_string::deserialize")]
    pub species_code: String,

    #[serde(default, with = "bar_list")]
    pub unique_gene_identifiers: Vec<String>,

    #[serde(default, with = "bar_list")]
    pub other_gene_identifiers: Vec<String>,

    #[serde(default, with = "bar_list")]
    pub gene_models: Vec<String>,

    #[serde(default, deserialize_with = "empty_string::deserialize")]
    pub text_unprocessed: String,

    #[serde(default, with = "bar_list")]
    pub annotations: Vec<String>,

    #[serde(default, deserialize_with = "empty_string::deserialize")]
    pub reference_name: String,

    #[serde(default, deserialize_with = "empty_string::deserialize")]
    pub reference_link: String,

    #[serde(default, deserialize_with = "empty_string::deserialize")]
    pub reference_file: String,
}

impl GeneRow {
    /// Whether this row carries a free-text description
    pub fn has_text(&self) -> bool {
        !self.text_unprocessed.trim().is_empty()
    }
}

// ============================================================================
// Final output records
// ============================================================================

/// One output row: an original [`GeneRow`] with its group-level identifier
/// lists, tokenized text and recognizer annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneRecord {
    pub gene_id: usize,

    #[serde(default, deserialize_with = "empty_string::deserialize")]
    pub species_name: String,

    #[serde(default, deserialize_with = "empty_string::deserialize")]
    pub species_code: String,

    #[serde(default, with = "bar_list")]
    pub unique_gene_identifiers: Vec<String>,

    #[serde(default, with = "bar_list")]
    pub other_gene_identifiers: Vec<String>,

    #[serde(default, with = "bar_list")]
    pub gene_models: Vec<String>,

    #[serde(default, with = "bar_list")]
    pub annotations: Vec<String>,

    /// Annotations produced by the concept recognizer
    #[serde(default, with = "bar_list")]
    pub annotations_nc: Vec<String>,

    #[serde(default, deserialize_with = "empty_string::deserialize")]
    pub text_unprocessed: String,

    #[serde(default, deserialize_with = "empty_string::deserialize")]
    pub text_tokenized_sents: String,

    #[serde(default, deserialize_with = "empty_string::deserialize")]
    pub text_tokenized_words: String,

    #[serde(default, deserialize_with = "empty_string::deserialize")]
    pub text_tokenized_stems: String,

    #[serde(default, deserialize_with = "empty_string::deserialize")]
    pub reference_name: String,

    #[serde(default, deserialize_with = "empty_string::deserialize")]
    pub reference_link: String,

    #[serde(default, deserialize_with = "empty_string::deserialize")]
    pub reference_file: String,
}

impl GeneRecord {
    /// Whether this record carries a free-text description
    pub fn has_text(&self) -> bool {
        !self.text_unprocessed.trim().is_empty()
    }

    /// Whether this record carries curated ontology annotations
    pub fn has_annotations(&self) -> bool {
        !self.annotations.is_empty()
    }

    /// Rebuild the input row this record represents, with the group-level
    /// identifier lists as row-level identifiers.
    pub fn to_row(&self) -> GeneRow {
        GeneRow {
            species_name: self.species_name.clone(),
            species_code: self.species_code.clone(),
            unique_gene_identifiers: self.unique_gene_identifiers.clone(),
            other_gene_identifiers: self.other_gene_identifiers.clone(),
            gene_models: self.gene_models.clone(),
            text_unprocessed: self.text_unprocessed.clone(),
            annotations: self.annotations.clone(),
            reference_name: self.reference_name.clone(),
            reference_link: self.reference_link.clone(),
            reference_file: self.reference_file.clone(),
        }
    }
}
