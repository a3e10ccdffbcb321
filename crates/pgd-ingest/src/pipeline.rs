// Dataset build orchestration

use crate::annotate::{annotate_records, ConceptRecognizer, NobleCoder};
use crate::config::PipelineConfig;
use crate::export::{render_json, render_json_sample, render_table, Artifact, Column, Delimiter};
use crate::merge::{merge_rows, MergeOptions, MergeOutcome};
use crate::reshaped;
use crate::text::TextPreprocessor;
use pgd_common::types::GeneRecord;
use pgd_common::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Basename of the full dataset
pub const FULL_NAME: &str = "genes_texts_annotations";
/// Basename of the subset with text
pub const TEXTS_NAME: &str = "genes_texts";
/// Basename of the subset with curated annotations
pub const ANNOTATIONS_NAME: &str = "genes_annotations";

/// Builds the combined dataset from reshaped source files
pub struct CombinePipeline {
    config: PipelineConfig,
    recognizer: Option<Box<dyn ConceptRecognizer>>,
    show_progress: bool,
}

impl CombinePipeline {
    /// Pipeline with the NOBLE Coder recognizer when the config names one
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let recognizer = config
            .noble_coder
            .clone()
            .map(|nc| Box::new(NobleCoder::new(nc)) as Box<dyn ConceptRecognizer>);
        Ok(Self {
            config,
            recognizer,
            show_progress: false,
        })
    }

    /// Replace the concept recognizer
    pub fn with_recognizer(mut self, recognizer: Box<dyn ConceptRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every step, then write all output files.
    ///
    /// Any failure before the final step leaves the output directories
    /// untouched.
    pub fn run(&self) -> Result<PipelineStats> {
        info!("Starting dataset build");
        let mut stats = PipelineStats::default();

        info!("Step 1/7: Loading reshaped files...");
        let paths = self.config.input_paths();
        let rows = reshaped::read_all(&paths)?;
        stats.files_read = paths.len();
        stats.rows_read = rows.len();
        info!("Loaded {} rows from {} files", rows.len(), paths.len());

        info!("Step 2/7: Resolving gene identities...");
        let MergeOutcome { groups, mut records, .. } = merge_rows(&rows, &self.config.merge);
        stats.groups = groups.len();

        info!("Step 3/7: Tokenizing descriptions...");
        let preprocessor = TextPreprocessor::new()?;
        stats.rows_with_text = preprocessor.tokenize_records(&mut records, self.show_progress);

        info!("Step 4/7: Sorting and removing duplicate rows...");
        let before = records.len();
        let mut records = sort_and_dedup(records);
        stats.duplicates_removed = before - records.len();

        info!("Step 5/7: Annotating descriptions...");
        match &self.recognizer {
            Some(recognizer) => {
                stats.rows_annotated =
                    annotate_records(recognizer.as_ref(), &mut records, &self.terminologies())?;
                info!("Recognizer found terms in {} rows", stats.rows_annotated);
            },
            None => info!("No concept recognizer configured, skipping"),
        }

        info!("Step 6/7: Filtering genes without text...");
        if self.config.filter_has_text {
            records = keep_genes_with_text(records);
        }
        stats.records_written = records.len();
        stats.genes_written = records.iter().map(|r| r.gene_id).collect::<HashSet<_>>().len();

        info!("Step 7/7: Writing output files...");
        let artifacts = self.artifacts(&records)?;
        for artifact in &artifacts {
            artifact.write()?;
        }
        stats.files_written = artifacts.len();

        info!("Dataset build completed: {:?}", stats);
        Ok(stats)
    }

    fn terminologies(&self) -> Vec<String> {
        self.config
            .noble_coder
            .as_ref()
            .map(|nc| nc.terminologies.clone())
            .unwrap_or_else(|| crate::annotate::NobleCoderConfig::default().terminologies)
    }

    /// Render every output file in memory
    pub fn artifacts(&self, records: &[GeneRecord]) -> Result<Vec<Artifact>> {
        let limits = &self.config.samples;
        let texts: Vec<&GeneRecord> = records.iter().filter(|r| r.has_text()).collect();
        let annotated: Vec<&GeneRecord> = records.iter().filter(|r| r.has_annotations()).collect();

        let mut artifacts = Vec::new();
        for delimiter in [Delimiter::Comma, Delimiter::Tab] {
            let data = |name: &str| self.config.output_dir.join(format!("{}.{}", name, delimiter.extension()));
            let sample = |name: &str| self.config.samples_dir.join(format!("{}.{}", name, delimiter.extension()));

            artifacts.push(Artifact::new(data(FULL_NAME), render_table(records, &Column::ALL, delimiter, None)?));
            artifacts.push(Artifact::new(
                data(TEXTS_NAME),
                render_table(texts.iter().copied(), &Column::ALL, delimiter, None)?,
            ));
            artifacts.push(Artifact::new(
                data(ANNOTATIONS_NAME),
                render_table(annotated.iter().copied(), &Column::ALL, delimiter, None)?,
            ));

            artifacts.push(Artifact::new(
                sample(FULL_NAME),
                render_table(records.iter().take(limits.rows), &Column::ALL, delimiter, Some(limits))?,
            ));
            artifacts.push(Artifact::new(
                sample(TEXTS_NAME),
                render_table(
                    texts.iter().copied().take(limits.rows),
                    &Column::TEXTS_SAMPLE,
                    delimiter,
                    Some(limits),
                )?,
            ));
            artifacts.push(Artifact::new(
                sample(ANNOTATIONS_NAME),
                render_table(
                    annotated.iter().copied().take(limits.rows),
                    &Column::ANNOTATIONS_SAMPLE,
                    delimiter,
                    Some(limits),
                )?,
            ));
        }

        let json_name = format!("{}.json", FULL_NAME);
        artifacts.push(Artifact::new(self.config.output_dir.join(&json_name), render_json(records)?));
        artifacts.push(Artifact::new(
            self.config.samples_dir.join(&json_name),
            render_json_sample(records, limits)?,
        ));
        Ok(artifacts)
    }
}

/// Stable sort by gene id, then drop rows identical to an earlier one
pub fn sort_and_dedup(mut records: Vec<GeneRecord>) -> Vec<GeneRecord> {
    records.sort_by_key(|r| r.gene_id);
    let mut seen = HashSet::new();
    records.retain(|r| seen.insert(r.clone()));
    records
}

/// Keep every row of the genes that have at least one row with text
pub fn keep_genes_with_text(records: Vec<GeneRecord>) -> Vec<GeneRecord> {
    let with_text: HashSet<usize> = records.iter().filter(|r| r.has_text()).map(|r| r.gene_id).collect();
    records.into_iter().filter(|r| with_text.contains(&r.gene_id)).collect()
}

/// Merge reshaped files and write one table with group ids, skipping text
/// processing and annotation.
pub fn merge_files(inputs: &[PathBuf], output: &Path, options: &MergeOptions) -> Result<MergeStats> {
    let rows = reshaped::read_all(inputs)?;
    let outcome = merge_rows(&rows, options);
    let bytes = render_table(&outcome.records, &Column::MERGED, Delimiter::from_path(output), None)?;
    Artifact::new(output, bytes).write()?;

    let stats = MergeStats {
        rows: rows.len(),
        groups: outcome.group_count(),
        largest_group: outcome.largest_group(),
    };
    info!(output = %output.display(), rows = stats.rows, groups = stats.groups, "Wrote merged table");
    Ok(stats)
}

/// Pipeline statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub files_read: usize,
    pub rows_read: usize,
    pub groups: usize,
    pub rows_with_text: usize,
    pub duplicates_removed: usize,
    pub rows_annotated: usize,
    pub records_written: usize,
    pub genes_written: usize,
    pub files_written: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub rows: usize,
    pub groups: usize,
    pub largest_group: usize,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::annotate::tests::{keyword_recognizer, FailingRecognizer};
    use crate::reshaped::tests::{write_file, HEADER};
    use tempfile::TempDir;

    fn setup(dir: &Path) -> PipelineConfig {
        let input = dir.join("reshaped");
        std::fs::create_dir_all(&input).unwrap();
        write_file(
            &input,
            "tair_phenotype_descriptions.csv",
            &format!(
                "{}\n\
                 arabidopsis,ath,AT1G01010|NAC001,ANAC001,AT1G01010,Dwarf; pale leaves.,,TAIR,https://www.arabidopsis.org,Locus_Germplasm_Phenotype.txt\n\
                 arabidopsis,ath,AT5G00001,,AT5G00001,Late flowering.,,TAIR,https://www.arabidopsis.org,Locus_Germplasm_Phenotype.txt\n",
                HEADER
            ),
        );
        write_file(
            &input,
            "tair_curated_go_annotations.csv",
            &format!(
                "{}\n\
                 arabidopsis,ath,nac001|ANAC001,,,,GO:0005634,TAIR,https://www.arabidopsis.org,ATH_GO_GOSLIM.txt\n\
                 arabidopsis,ath,AT3G99999,,,,GO:0008150,TAIR,https://www.arabidopsis.org,ATH_GO_GOSLIM.txt\n\
                 arabidopsis,ath,nac001|ANAC001,,,,GO:0005634,TAIR,https://www.arabidopsis.org,ATH_GO_GOSLIM.txt\n",
                HEADER
            ),
        );

        PipelineConfig::builder()
            .input_dir(&input)
            .input_files(["tair_phenotype_descriptions.csv", "tair_curated_go_annotations.csv"])
            .output_dir(dir.join("final").join("data"))
            .samples_dir(dir.join("final").join("samples"))
            .build()
    }

    fn read_records(path: &Path) -> Vec<GeneRecord> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader.deserialize().collect::<std::result::Result<_, _>>().unwrap()
    }

    #[test]
    fn test_sort_and_dedup() {
        let r = |id: usize, text: &str| GeneRecord {
            gene_id: id,
            text_unprocessed: text.to_string(),
            ..Default::default()
        };
        let out = sort_and_dedup(vec![r(1, "b"), r(0, "a"), r(1, "b"), r(1, "c")]);
        assert_eq!(out, vec![r(0, "a"), r(1, "b"), r(1, "c")]);
    }

    #[test]
    fn test_keep_genes_with_text_keeps_whole_genes() {
        let r = |id: usize, text: &str| GeneRecord {
            gene_id: id,
            text_unprocessed: text.to_string(),
            ..Default::default()
        };
        let out = keep_genes_with_text(vec![r(0, "Dwarf"), r(0, ""), r(1, "")]);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|rec| rec.gene_id == 0));
    }

    #[test]
    fn test_full_run() {
        let dir = TempDir::new().unwrap();
        let config = setup(dir.path());
        let pipeline = CombinePipeline::new(config.clone())
            .unwrap()
            .with_recognizer(Box::new(keyword_recognizer()));

        let stats = pipeline.run().unwrap();
        assert_eq!(stats.files_read, 2);
        assert_eq!(stats.rows_read, 5);
        assert_eq!(stats.groups, 3);
        assert_eq!(stats.duplicates_removed, 1);
        assert_eq!(stats.rows_annotated, 1);
        // AT3G99999 has no text anywhere
        assert_eq!(stats.records_written, 3);
        assert_eq!(stats.genes_written, 2);
        assert_eq!(stats.files_written, 14);

        let records = read_records(&config.output_dir.join("genes_texts_annotations.csv"));
        assert_eq!(records.len(), 3);
        let first = &records[0];
        assert_eq!(first.gene_id, 0);
        assert_eq!(first.unique_gene_identifiers, vec!["NAC001", "nac001", "ANAC001", "AT1G01010"]);
        assert!(first.other_gene_identifiers.is_empty());
        assert_eq!(first.text_tokenized_sents, "[SENT] Dwarf. [SENT] pale leaves.");
        assert_eq!(first.annotations_nc, vec!["PATO:0000569", "PATO:0000327", "PO:0025034"]);
        assert_eq!(records[1].annotations, vec!["GO:0005634"]);

        let texts = read_records(&config.output_dir.join("genes_texts.csv"));
        assert_eq!(texts.len(), 2);
        let annotations = read_records(&config.output_dir.join("genes_annotations.csv"));
        assert_eq!(annotations.len(), 1);

        let sample = std::fs::read_to_string(config.samples_dir.join("genes_annotations.csv")).unwrap();
        assert!(!sample.lines().next().unwrap().contains("text_unprocessed"));
        assert!(config.samples_dir.join("genes_texts_annotations.json").is_file());
        assert!(config.output_dir.join("genes_texts_annotations.tsv").is_file());
    }

    #[test]
    fn test_failed_annotation_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = setup(dir.path());
        let pipeline = CombinePipeline::new(config.clone())
            .unwrap()
            .with_recognizer(Box::new(FailingRecognizer));

        assert!(pipeline.run().is_err());
        assert!(!config.output_dir.exists());
        assert!(!config.samples_dir.exists());
    }

    #[test]
    fn test_schema_error_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = setup(dir.path());
        write_file(&config.input_dir, "tair_curated_go_annotations.csv", "species,genes\nath,x\n");

        let err = CombinePipeline::new(config.clone()).unwrap().run().unwrap_err();
        assert!(err.to_string().contains("tair_curated_go_annotations.csv"));
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn test_merge_files_writes_group_ids() {
        let dir = TempDir::new().unwrap();
        let config = setup(dir.path());
        let output = dir.path().join("merged.tsv");

        let stats = merge_files(&config.input_paths(), &output, &MergeOptions::default()).unwrap();
        assert_eq!(stats.rows, 5);
        assert_eq!(stats.groups, 3);
        assert_eq!(stats.largest_group, 3);

        let content = std::fs::read_to_string(&output).unwrap();
        let header = content.lines().next().unwrap();
        assert!(header.starts_with("group_id\tspecies_name"));
        assert_eq!(content.lines().count(), 6);
    }
}
