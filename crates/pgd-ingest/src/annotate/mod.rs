//! Concept recognition over phenotype descriptions
//!
//! A [`ConceptRecognizer`] maps row indices to ontology term ids found in the
//! row's text. The only production implementation shells out to NOBLE Coder
//! ([`NobleCoder`]); tests use in-memory fakes.
//!
//! Recognizer failures are fatal. Nothing here retries.

pub mod noble_coder;

pub use noble_coder::{NobleCoder, NobleCoderConfig};

use pgd_common::types::GeneRecord;
use pgd_common::{PgdError, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use tracing::info;

/// Error types for concept recognition
#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Recognizer exited with {status} on terminology '{terminology}': {stderr}")]
    ExitStatus {
        terminology: String,
        status: String,
        stderr: String,
    },

    #[error("Recognizer produced no results file at {0}")]
    MissingResults(PathBuf),

    #[error("Malformed results file {file}: {message}")]
    MalformedResults { file: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<AnnotateError> for PgdError {
    fn from(err: AnnotateError) -> Self {
        PgdError::Annotation(err.to_string())
    }
}

/// Finds ontology terms in free text.
pub trait ConceptRecognizer {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Annotate every text against one terminology.
    ///
    /// The returned map has exactly the keys of `texts`; texts without hits
    /// map to an empty list.
    fn annotate(&self, texts: &BTreeMap<usize, String>, terminology: &str) -> Result<BTreeMap<usize, Vec<String>>>;
}

/// Run every terminology in order and concatenate the hits per text,
/// dropping repeats.
pub fn annotate_all(
    recognizer: &dyn ConceptRecognizer,
    texts: &BTreeMap<usize, String>,
    terminologies: &[String],
) -> Result<BTreeMap<usize, Vec<String>>> {
    let mut combined: BTreeMap<usize, Vec<String>> = texts.keys().map(|&k| (k, Vec::new())).collect();
    let mut seen: BTreeMap<usize, HashSet<String>> = texts.keys().map(|&k| (k, HashSet::new())).collect();

    for terminology in terminologies {
        let hits = recognizer.annotate(texts, terminology)?;
        let total: usize = hits.values().map(Vec::len).sum();
        info!(recognizer = recognizer.name(), terminology = %terminology, hits = total, "Annotated texts");

        for (index, terms) in hits {
            let (Some(out), Some(seen)) = (combined.get_mut(&index), seen.get_mut(&index)) else {
                continue;
            };
            for term in terms {
                if seen.insert(term.clone()) {
                    out.push(term);
                }
            }
        }
    }

    Ok(combined)
}

/// Fill `annotations_nc` for every record with text.
///
/// Returns how many records received at least one term.
pub fn annotate_records(
    recognizer: &dyn ConceptRecognizer,
    records: &mut [GeneRecord],
    terminologies: &[String],
) -> Result<usize> {
    let texts: BTreeMap<usize, String> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.has_text())
        .map(|(index, record)| (index, record.text_unprocessed.clone()))
        .collect();

    let mut annotated = annotate_all(recognizer, &texts, terminologies)?;
    let mut with_terms = 0;
    for (index, record) in records.iter_mut().enumerate() {
        record.annotations_nc = annotated.remove(&index).unwrap_or_default();
        if !record.annotations_nc.is_empty() {
            with_terms += 1;
        }
    }
    Ok(with_terms)
}
