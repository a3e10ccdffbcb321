//! End-to-end tests for the pgd binary
//!
//! These tests run the built binary against small reshaped files:
//! - Full combine run and its output layout
//! - Standalone merge with group ids
//! - Dataset checks and their exit codes
//! - Error reporting for malformed inputs

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const HEADER: &str = "species_name,species_code,unique_gene_identifiers,other_gene_identifiers,gene_models,text_unprocessed,annotations,reference_name,reference_link,reference_file";

fn pgd() -> Command {
    let mut cmd = Command::cargo_bin("pgd").unwrap();
    for var in [
        "PGD_CONFIG",
        "PGD_INPUT_DIR",
        "PGD_OUTPUT_DIR",
        "PGD_SAMPLES_DIR",
        "PGD_CASE_SENSITIVE",
        "PGD_NOBLE_CODER_JAR",
        "PGD_LOG_OUTPUT",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn write_reshaped(dir: &Path, name: &str, rows: &[&str]) {
    let mut body = String::from(HEADER);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    body.push('\n');
    std::fs::write(dir.join(name), body).unwrap();
}

fn setup_inputs(dir: &Path) {
    write_reshaped(
        dir,
        "phenotypes.csv",
        &[
            "arabidopsis,ath,AT1G01010|NAC001,,AT1G01010,Dwarf; pale leaves.,,TAIR,https://www.arabidopsis.org,phenotypes.txt",
            "maize,zma,NAC001,,,Short plants.,,MaizeGDB,https://www.maizegdb.org,maize.txt",
        ],
    );
    write_reshaped(
        dir,
        "go.csv",
        &["arabidopsis,ath,nac001|ANAC001,,,,GO:0005634,TAIR,https://www.arabidopsis.org,go.txt"],
    );
}

// ============================================================================
// Combine
// ============================================================================

#[test]
fn test_combine_writes_all_outputs() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reshaped");
    std::fs::create_dir_all(&input).unwrap();
    setup_inputs(&input);
    let output = dir.path().join("data");
    let samples = dir.path().join("samples");

    pgd()
        .arg("combine")
        .arg("--input-dir")
        .arg(&input)
        .arg("--output-dir")
        .arg(&output)
        .arg("--samples-dir")
        .arg(&samples)
        .arg("phenotypes.csv")
        .arg("go.csv")
        .assert()
        .success()
        .stdout(predicate::str::contains("Combined 3 rows into 2 genes"));

    for name in ["genes_texts_annotations", "genes_texts", "genes_annotations"] {
        for ext in ["csv", "tsv"] {
            assert!(output.join(format!("{name}.{ext}")).is_file(), "{name}.{ext}");
            assert!(samples.join(format!("{name}.{ext}")).is_file(), "sample {name}.{ext}");
        }
    }
    assert!(output.join("genes_texts_annotations.json").is_file());
    assert!(samples.join("genes_texts_annotations.json").is_file());

    let full = std::fs::read_to_string(output.join("genes_texts_annotations.csv")).unwrap();
    assert!(full.starts_with("gene_id,species_name,species_code,"));
    assert!(full.contains("[SENT] Dwarf. [SENT] pale leaves."));
    // The GO row joins the arabidopsis gene through NAC001 and carries its term
    assert!(full.contains("GO:0005634"));
}

#[test]
fn test_combine_missing_input_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("data");

    pgd()
        .arg("combine")
        .arg("--input-dir")
        .arg(dir.path())
        .arg("--output-dir")
        .arg(&output)
        .arg("--samples-dir")
        .arg(dir.path().join("samples"))
        .arg("absent.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.csv"));

    assert!(!output.exists());
}

#[test]
fn test_combine_schema_mismatch() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.csv"), "species_code,text\nath,Dwarf.\n").unwrap();

    pgd()
        .arg("combine")
        .arg("--input-dir")
        .arg(dir.path())
        .arg("--output-dir")
        .arg(dir.path().join("data"))
        .arg("--samples-dir")
        .arg(dir.path().join("samples"))
        .arg("bad.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Schema mismatch"));
}

// ============================================================================
// Merge
// ============================================================================

#[test]
fn test_merge_writes_group_ids() {
    let dir = TempDir::new().unwrap();
    setup_inputs(dir.path());
    let output = dir.path().join("merged.tsv");

    pgd()
        .arg("merge")
        .arg("--output")
        .arg(&output)
        .arg(dir.path().join("phenotypes.csv"))
        .arg(dir.path().join("go.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged 3 rows into 2 groups"));

    let merged = std::fs::read_to_string(&output).unwrap();
    let header = merged.lines().next().unwrap();
    assert!(header.starts_with("group_id\t"));
}

#[test]
fn test_merge_case_sensitive_splits_groups() {
    let dir = TempDir::new().unwrap();
    setup_inputs(dir.path());

    pgd()
        .arg("merge")
        .arg("--case-sensitive")
        .arg("-o")
        .arg(dir.path().join("merged.csv"))
        .arg(dir.path().join("phenotypes.csv"))
        .arg(dir.path().join("go.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged 3 rows into 3 groups"));
}

fn write_case_pair(dir: &Path) -> std::path::PathBuf {
    write_reshaped(
        dir,
        "case.csv",
        &[
            "arabidopsis,ath,NAC001,,,Dwarf.,,TAIR,,a.txt",
            "arabidopsis,ath,nac001,,,Pale.,,TAIR,,b.txt",
        ],
    );
    dir.join("case.csv")
}

#[test]
fn test_merge_honors_case_sensitive_env() {
    let dir = TempDir::new().unwrap();
    let input = write_case_pair(dir.path());

    pgd()
        .env("PGD_CASE_SENSITIVE", "true")
        .arg("merge")
        .arg("-o")
        .arg(dir.path().join("merged.csv"))
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged 2 rows into 2 groups"));
}

#[test]
fn test_merge_honors_case_sensitive_config_file() {
    let dir = TempDir::new().unwrap();
    let input = write_case_pair(dir.path());
    let config = dir.path().join("pgd.toml");
    std::fs::write(&config, "[merge]\ncase_sensitive = true\n").unwrap();

    pgd()
        .arg("-c")
        .arg(&config)
        .arg("merge")
        .arg("-o")
        .arg(dir.path().join("merged.csv"))
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged 2 rows into 2 groups"));

    // Without either setting the two spellings are one gene
    pgd()
        .arg("merge")
        .arg("-o")
        .arg(dir.path().join("merged_default.csv"))
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged 2 rows into 1 groups"));
}

// ============================================================================
// Check
// ============================================================================

#[test]
fn test_check_clean_dataset() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reshaped");
    std::fs::create_dir_all(&input).unwrap();
    setup_inputs(&input);
    let output = dir.path().join("data");

    pgd()
        .args(["combine", "phenotypes.csv", "go.csv"])
        .arg("--input-dir")
        .arg(&input)
        .arg("--output-dir")
        .arg(&output)
        .arg("--samples-dir")
        .arg(dir.path().join("samples"))
        .assert()
        .success();

    pgd()
        .arg("check")
        .arg(output.join("genes_texts_annotations.tsv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("no problems found"));
}

#[test]
fn test_check_reports_violations() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.csv");
    std::fs::write(&path, "gene_id,text_unprocessed\n0,Dwarf|pale\n").unwrap();

    pgd()
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("row 1: text_unprocessed contains '|'"))
        .stdout(predicate::str::contains("missing column: species_name"));
}

// ============================================================================
// CLI surface
// ============================================================================

#[test]
fn test_help_lists_commands() {
    pgd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("combine"))
        .stdout(predicate::str::contains("merge"))
        .stdout(predicate::str::contains("groupings"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_groupings_without_sources_fails() {
    let dir = TempDir::new().unwrap();

    pgd()
        .current_dir(dir.path())
        .arg("groupings")
        .assert()
        .failure()
        .stderr(predicate::str::contains("grouping"));
}
