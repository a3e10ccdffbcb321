//! Loading reshaped source files
//!
//! Every upstream adapter writes the same ten columns (in any order). A file
//! with any other column set aborts the run before anything is merged.

use crate::export::Delimiter;
use pgd_common::types::{GeneRow, RESHAPED_COLUMNS};
use pgd_common::{PgdError, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Check that `actual` is exactly the reshaped column set.
pub fn validate_columns(file: &Path, actual: &[String]) -> Result<()> {
    let expected: BTreeSet<&str> = RESHAPED_COLUMNS.iter().copied().collect();
    let found: BTreeSet<&str> = actual.iter().map(String::as_str).collect();

    if found != expected || actual.len() != RESHAPED_COLUMNS.len() {
        return Err(PgdError::Schema {
            file: file.to_path_buf(),
            expected: RESHAPED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            actual: actual.to_vec(),
        });
    }
    Ok(())
}

/// Read one reshaped CSV/TSV file.
pub fn read_reshaped(path: &Path) -> Result<Vec<GeneRow>> {
    if !path.is_file() {
        return Err(PgdError::config(format!("Reshaped file not found: {}", path.display())));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(Delimiter::from_path(path).as_byte())
        .from_path(path)?;

    let headers: csv::StringRecord = reader.headers()?.iter().map(str::trim).collect();
    let columns: Vec<String> = headers.iter().map(str::to_string).collect();
    validate_columns(path, &columns)?;
    reader.set_headers(headers);

    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<GeneRow>, csv::Error>>()?;

    let file = path.display().to_string();
    if rows.is_empty() {
        warn!(file = %file, "Reshaped file contributed no rows");
    } else {
        info!(file = %file, rows = rows.len(), "Loaded reshaped file");
    }
    Ok(rows)
}

/// Read and stack every file in order. The first bad file aborts the load.
pub fn read_all<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<GeneRow>> {
    let mut rows = Vec::new();
    for path in paths {
        rows.extend(read_reshaped(path.as_ref())?);
    }
    Ok(rows)
}

/// Resolve configured file names against the input directory
pub fn resolve_paths(dir: &Path, files: &[String]) -> Vec<PathBuf> {
    files.iter().map(|f| dir.join(f)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub(crate) const HEADER: &str = "species_name,species_code,unique_gene_identifiers,other_gene_identifiers,gene_models,text_unprocessed,annotations,reference_name,reference_link,reference_file";

    pub(crate) fn write_file(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_reads_rows_in_any_column_order() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "a.csv",
            "reference_file,species_code,species_name,unique_gene_identifiers,other_gene_identifiers,gene_models,text_unprocessed,annotations,reference_name,reference_link\n\
             f.txt,ath,arabidopsis,AT1G01010|NAC001,,AT1G01010,Dwarf.,,TAIR,https://www.arabidopsis.org\n",
        );
        let rows = read_reshaped(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].species_code, "ath");
        assert_eq!(rows[0].reference_file, "f.txt");
        assert_eq!(rows[0].unique_gene_identifiers, vec!["AT1G01010", "NAC001"]);
    }

    #[test]
    fn test_tsv_by_extension() {
        let dir = TempDir::new().unwrap();
        let body = format!("{}\nmaize\tzma\tbm1\t\t\t\t\tMaizeGDB\t\t\n", HEADER.replace(',', "\t"));
        let path = write_file(dir.path(), "b.tsv", &body);
        let rows = read_reshaped(&path).unwrap();
        assert_eq!(rows[0].unique_gene_identifiers, vec!["bm1"]);
        assert!(!rows[0].has_text());
    }

    #[test]
    fn test_schema_mismatch_names_file_and_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "sgn_phenotype_descriptions.csv", "species,gene\nsly,x\n");
        let err = read_reshaped(&path).unwrap_err();
        match &err {
            PgdError::Schema { file, expected, actual } => {
                assert_eq!(file, &path);
                assert_eq!(expected.len(), 10);
                assert_eq!(actual, &vec!["species".to_string(), "gene".to_string()]);
            },
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("sgn_phenotype_descriptions.csv"));
    }

    #[test]
    fn test_extra_column_is_a_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "c.csv", &format!("{},extra\n", HEADER));
        assert!(matches!(read_reshaped(&path), Err(PgdError::Schema { .. })));
    }

    #[test]
    fn test_read_all_stacks_in_order() {
        let dir = TempDir::new().unwrap();
        let a = write_file(dir.path(), "a.csv", &format!("{}\n,ath,A,,,,,,,\n", HEADER));
        let b = write_file(dir.path(), "b.csv", &format!("{}\n,ath,B,,,,,,,\n,ath,C,,,,,,,\n", HEADER));
        let rows = read_all(&[a, b]).unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.unique_gene_identifiers[0].as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_missing_file() {
        let err = read_reshaped(Path::new("/nonexistent/reshaped.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/reshaped.csv"));
    }
}
