//! Output files
//!
//! Everything is rendered to bytes first and written through a temporary
//! file in the target directory, so a file is either fully written or left
//! untouched.

pub mod columns;
pub mod json;
pub mod sample;
pub mod table;

pub use columns::Column;
pub use json::{render_json, render_json_sample, to_json_genes, JsonGene};
pub use sample::{truncate_chars, SampleLimits};
pub use table::{render_table, write_table};

use pgd_common::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Field delimiter of a table file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Delimiter::Comma => "csv",
            Delimiter::Tab => "tsv",
        }
    }

    /// `.tsv` and `.txt` files are tab separated, anything else comma
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
            Some("tsv") | Some("txt") => Delimiter::Tab,
            _ => Delimiter::Comma,
        }
    }
}

/// A rendered file waiting to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }

    pub fn write(&self) -> Result<()> {
        write_atomic(&self.path, &self.bytes)
    }
}

/// Write `bytes` to `path` via a temporary sibling file and a rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), bytes = bytes.len(), "Wrote file");
    Ok(())
}
