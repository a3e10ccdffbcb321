// Pipeline configuration

use crate::annotate::NobleCoderConfig;
use crate::export::SampleLimits;
use crate::groupings::GroupingsConfig;
use crate::merge::MergeOptions;
use pgd_common::{PgdError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a dataset build
///
/// Loaded from TOML; every field has a default, so a file only needs the
/// settings it changes:
///
/// ```toml
/// input_dir = "reshaped/data"
/// output_dir = "final/data"
///
/// [merge]
/// case_sensitive = false
///
/// [noble_coder]
/// jar = "lib/NobleCoder-1.0.jar"
/// terminologies = ["pato", "po", "go"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the reshaped source files
    pub input_dir: PathBuf,

    /// Reshaped files to stack, relative to `input_dir`, in order
    pub input_files: Vec<String>,

    /// Directory for the full output files
    pub output_dir: PathBuf,

    /// Directory for truncated sample files
    pub samples_dir: PathBuf,

    pub merge: MergeOptions,

    /// Drop genes none of whose rows carry text
    pub filter_has_text: bool,

    pub samples: SampleLimits,

    /// Concept recognizer settings; annotation is skipped when absent
    pub noble_coder: Option<NobleCoderConfig>,

    pub groupings: GroupingsConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            input_dir: PathBuf::from("reshaped/data"),
            input_files: [
                "oellrich_walls_phene_descriptions.csv",
                "oellrich_walls_phenotype_descriptions.csv",
                "oellrich_walls_annotations.csv",
                "sgn_phenotype_descriptions.csv",
                "maizegdb_phenotype_descriptions.csv",
                "maizegdb_curated_go_annotations.csv",
                "tair_phenotype_descriptions.csv",
                "tair_curated_go_annotations.csv",
                "tair_curated_po_annotations.csv",
                "planteome_curated_annotations.csv",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
            output_dir: PathBuf::from("final/data"),
            samples_dir: PathBuf::from("final/samples"),
            merge: MergeOptions::default(),
            filter_has_text: true,
            samples: SampleLimits::default(),
            noble_coder: None,
            groupings: GroupingsConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Create new config with builder pattern
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Load a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PgdError::config(format!("Failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&raw).map_err(|e| PgdError::config(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Apply environment overrides
    ///
    /// - `PGD_INPUT_DIR`, `PGD_OUTPUT_DIR`, `PGD_SAMPLES_DIR`
    /// - `PGD_CASE_SENSITIVE`: true/false/1/0
    /// - `PGD_NOBLE_CODER_JAR`: enables annotation with this jar
    pub fn merge_env(self) -> Result<Self> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    fn merge_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(dir) = var("PGD_INPUT_DIR") {
            self.input_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("PGD_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("PGD_SAMPLES_DIR") {
            self.samples_dir = PathBuf::from(dir);
        }
        if let Some(flag) = var("PGD_CASE_SENSITIVE") {
            self.merge.case_sensitive = parse_flag(&flag)
                .ok_or_else(|| PgdError::config(format!("PGD_CASE_SENSITIVE must be a boolean, got '{}'", flag)))?;
        }
        if let Some(jar) = var("PGD_NOBLE_CODER_JAR") {
            let mut noble = self.noble_coder.take().unwrap_or_default();
            noble.jar = PathBuf::from(jar);
            self.noble_coder = Some(noble);
        }
        Ok(self)
    }

    /// Paths of the configured input files
    pub fn input_paths(&self) -> Vec<PathBuf> {
        crate::reshaped::resolve_paths(&self.input_dir, &self.input_files)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.input_files.is_empty() {
            return Err(PgdError::config("No input files configured"));
        }

        if self.merge.separator.is_empty() {
            return Err(PgdError::config("Identifier separator cannot be empty"));
        }

        if self.output_dir == self.samples_dir {
            return Err(PgdError::config("Output and samples directories must differ"));
        }

        if let Some(noble) = &self.noble_coder {
            if noble.terminologies.is_empty() {
                return Err(PgdError::config("NOBLE Coder needs at least one terminology"));
            }
            if noble.search.is_empty() {
                return Err(PgdError::config("NOBLE Coder search strategy cannot be empty"));
            }
        }

        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Builder for PipelineConfig
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    input_dir: Option<PathBuf>,
    input_files: Option<Vec<String>>,
    output_dir: Option<PathBuf>,
    samples_dir: Option<PathBuf>,
    case_sensitive: Option<bool>,
    separator: Option<String>,
    filter_has_text: Option<bool>,
    samples: Option<SampleLimits>,
    noble_coder: Option<NobleCoderConfig>,
}

impl PipelineConfigBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(dir.into());
        self
    }

    pub fn input_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_files = Some(files.into_iter().map(Into::into).collect());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn samples_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.samples_dir = Some(dir.into());
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn filter_has_text(mut self, filter: bool) -> Self {
        self.filter_has_text = Some(filter);
        self
    }

    pub fn samples(mut self, limits: SampleLimits) -> Self {
        self.samples = Some(limits);
        self
    }

    pub fn noble_coder(mut self, config: NobleCoderConfig) -> Self {
        self.noble_coder = Some(config);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();

        PipelineConfig {
            input_dir: self.input_dir.unwrap_or(default.input_dir),
            input_files: self.input_files.unwrap_or(default.input_files),
            output_dir: self.output_dir.unwrap_or(default.output_dir),
            samples_dir: self.samples_dir.unwrap_or(default.samples_dir),
            merge: MergeOptions {
                case_sensitive: self.case_sensitive.unwrap_or(default.merge.case_sensitive),
                separator: self.separator.unwrap_or(default.merge.separator),
            },
            filter_has_text: self.filter_has_text.unwrap_or(default.filter_has_text),
            samples: self.samples.unwrap_or(default.samples),
            noble_coder: self.noble_coder.or(default.noble_coder),
            groupings: default.groupings,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.input_files.len(), 10);
        assert!(!config.merge.case_sensitive);
        assert_eq!(config.merge.separator, "[SEP]");
        assert!(config.filter_has_text);
        assert!(config.noble_coder.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = PipelineConfig::builder()
            .input_dir("/data/reshaped")
            .input_files(["tair_phenotype_descriptions.csv"])
            .case_sensitive(true)
            .noble_coder(NobleCoderConfig::new("/opt/NobleCoder-1.0.jar"))
            .build();

        assert_eq!(config.input_paths(), vec![PathBuf::from("/data/reshaped/tair_phenotype_descriptions.csv")]);
        assert!(config.merge.case_sensitive);
        assert_eq!(config.noble_coder.unwrap().terminologies, vec!["pato", "po", "go"]);
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pgd.toml");
        std::fs::write(
            &path,
            r#"
input_dir = "in"
input_files = ["a.csv", "b.tsv"]

[merge]
case_sensitive = true

[samples]
rows = 5

[noble_coder]
jar = "nc.jar"
terminologies = ["go"]
"#,
        )
        .unwrap();

        let config = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(config.input_dir, PathBuf::from("in"));
        assert_eq!(config.input_files, vec!["a.csv", "b.tsv"]);
        assert!(config.merge.case_sensitive);
        assert_eq!(config.merge.separator, "[SEP]");
        assert_eq!(config.samples.rows, 5);
        assert_eq!(config.samples.unique_chars, 30);
        let noble = config.noble_coder.unwrap();
        assert_eq!(noble.terminologies, vec!["go"]);
        assert_eq!(noble.search, "precise-match");
    }

    #[test]
    fn test_from_file_rejects_unknown_types() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "filter_has_text = \"sometimes\"").unwrap();
        let err = PipelineConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, PgdError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PGD_OUTPUT_DIR", "/tmp/out"),
            ("PGD_CASE_SENSITIVE", "yes"),
            ("PGD_NOBLE_CODER_JAR", "/opt/nc.jar"),
        ]
        .into_iter()
        .collect();
        let config = PipelineConfig::default()
            .merge_vars(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert!(config.merge.case_sensitive);
        assert_eq!(config.noble_coder.unwrap().jar, PathBuf::from("/opt/nc.jar"));
    }

    #[test]
    fn test_bad_env_flag() {
        let result = PipelineConfig::default().merge_vars(|k| (k == "PGD_CASE_SENSITIVE").then(|| "maybe".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate() {
        let config = PipelineConfig::builder().input_files(Vec::<String>::new()).build();
        assert!(config.validate().is_err());

        let config = PipelineConfig::builder().separator("").build();
        assert!(config.validate().is_err());

        let config = PipelineConfig::builder().output_dir("same").samples_dir("same").build();
        assert!(config.validate().is_err());

        let mut noble = NobleCoderConfig::default();
        noble.terminologies.clear();
        let config = PipelineConfig::builder().noble_coder(noble).build();
        assert!(config.validate().is_err());
    }
}
