//! NOBLE Coder concept recognizer
//!
//! Each call writes the texts into a scratch input directory as `<index>.txt`,
//! runs the NOBLE Coder jar once for the terminology, and reads the
//! `RESULTS.tsv` it leaves in the output directory.

use super::{AnnotateError, ConceptRecognizer};
use pgd_common::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

const RESULTS_FILE: &str = "RESULTS.tsv";

/// Longest stderr excerpt carried into an error message
const STDERR_EXCERPT_CHARS: usize = 2_000;

/// NOBLE Coder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NobleCoderConfig {
    /// Path to the NOBLE Coder jar
    pub jar: PathBuf,

    /// Java launcher
    pub java: PathBuf,

    /// Terminologies to run, in order
    pub terminologies: Vec<String>,

    /// Value of the `-search` flag
    pub search: String,
}

impl Default for NobleCoderConfig {
    fn default() -> Self {
        Self {
            jar: PathBuf::from("lib/NobleCoder-1.0.jar"),
            java: PathBuf::from("java"),
            terminologies: vec!["pato".to_string(), "po".to_string(), "go".to_string()],
            search: "precise-match".to_string(),
        }
    }
}

impl NobleCoderConfig {
    pub fn new(jar: impl Into<PathBuf>) -> Self {
        Self {
            jar: jar.into(),
            ..Default::default()
        }
    }
}

/// Runs NOBLE Coder as an external process
#[derive(Debug, Clone)]
pub struct NobleCoder {
    config: NobleCoderConfig,
}

impl NobleCoder {
    pub fn new(config: NobleCoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NobleCoderConfig {
        &self.config
    }

    fn run(&self, input: &Path, output: &Path, terminology: &str) -> std::result::Result<(), AnnotateError> {
        let program = self.config.java.display().to_string();
        debug!(program = %program, terminology, "Running NOBLE Coder");

        let result = Command::new(&self.config.java)
            .arg("-jar")
            .arg(&self.config.jar)
            .args(["-terminology", terminology])
            .arg("-input")
            .arg(input)
            .arg("-output")
            .arg(output)
            .args(["-search", &self.config.search])
            .output()
            .map_err(|source| AnnotateError::Launch { program, source })?;

        if !result.status.success() {
            let stderr: String = String::from_utf8_lossy(&result.stderr)
                .trim()
                .chars()
                .take(STDERR_EXCERPT_CHARS)
                .collect();
            return Err(AnnotateError::ExitStatus {
                terminology: terminology.to_string(),
                status: result.status.to_string(),
                stderr,
            });
        }
        Ok(())
    }
}

impl ConceptRecognizer for NobleCoder {
    fn name(&self) -> &str {
        "noble-coder"
    }

    fn annotate(&self, texts: &BTreeMap<usize, String>, terminology: &str) -> Result<BTreeMap<usize, Vec<String>>> {
        let mut out: BTreeMap<usize, Vec<String>> = texts.keys().map(|&k| (k, Vec::new())).collect();
        if texts.is_empty() {
            return Ok(out);
        }

        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join("input");
        let output = scratch.path().join("output");
        std::fs::create_dir_all(&input)?;
        std::fs::create_dir_all(&output)?;
        for (index, text) in texts {
            std::fs::write(input.join(format!("{}.txt", index)), text)?;
        }

        self.run(&input, &output, terminology)?;

        for (index, terms) in parse_results(&output.join(RESULTS_FILE))? {
            if let Some(slot) = out.get_mut(&index) {
                *slot = terms;
            }
        }
        Ok(out)
    }
}

/// Turn NOBLE Coder's `PATO_0000569` into `PATO:0000569`
pub fn normalize_code(code: &str) -> String {
    code.trim().replacen('_', ":", 1)
}

/// Read a NOBLE Coder `RESULTS.tsv` into document index -> term ids.
///
/// Documents are named `<index>.txt`; terms are deduplicated per document in
/// the order they appear.
pub fn parse_results(path: &Path) -> std::result::Result<BTreeMap<usize, Vec<String>>, AnnotateError> {
    if !path.is_file() {
        return Err(AnnotateError::MissingResults(path.to_path_buf()));
    }
    let malformed = |message: String| AnnotateError::MalformedResults {
        file: path.to_path_buf(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| malformed(format!("missing column '{}'", name)))
    };
    let document_col = column("Document")?;
    let code_col = column("Code")?;

    let mut results: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    let mut seen: HashSet<(usize, String)> = HashSet::new();
    for record in reader.records() {
        let record = record?;
        let (Some(document), Some(code)) = (record.get(document_col), record.get(code_col)) else {
            continue;
        };
        let index = document
            .trim()
            .trim_end_matches(".txt")
            .parse::<usize>()
            .map_err(|_| malformed(format!("unexpected document name '{}'", document)))?;
        let code = normalize_code(code);
        if code.is_empty() {
            continue;
        }
        if seen.insert((index, code.clone())) {
            results.entry(index).or_default().push(code);
        }
    }
    Ok(results)
}
