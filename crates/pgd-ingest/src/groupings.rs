//! Gene groupings (pathways, phenotype classes and subsets)
//!
//! Each source is a membership table with `species`, `group_ids` and
//! `gene_identifiers` columns, the two list columns pipe-delimited, plus an
//! optional `group_id,group_name` map. Sources are flattened into one row per
//! (group, gene identifier) pair and stacked into `groupings.csv`.

use crate::export::{write_atomic, Artifact};
use pgd_common::types::bar_list;
use pgd_common::{PgdError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::info;

/// One membership table and how to label it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingSource {
    pub path: PathBuf,

    /// CSV with `group_id,group_name` columns
    pub name_map: Option<PathBuf>,

    /// e.g. "biochemical pathway", "phenotype class"
    pub group_type: String,

    pub reference_name: String,
    pub reference_file: String,
    pub reference_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingsConfig {
    pub sources: Vec<GroupingSource>,

    /// Species code to species name
    pub species: BTreeMap<String, String>,

    pub output: PathBuf,
    pub sample_output: PathBuf,
    pub sample_rows: usize,
}

impl Default for GroupingsConfig {
    fn default() -> Self {
        let species = [
            ("ath", "arabidopsis"),
            ("zma", "maize"),
            ("sly", "tomato"),
            ("gmx", "soybean"),
            ("osa", "rice"),
            ("mtr", "medicago"),
        ]
        .iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect();

        Self {
            sources: Vec::new(),
            species,
            output: PathBuf::from("final/data/groupings.csv"),
            sample_output: PathBuf::from("final/samples/groupings.csv"),
            sample_rows: 100,
        }
    }
}

/// Input row of a membership table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MembershipRow {
    #[serde(default)]
    pub species: String,

    #[serde(default, with = "bar_list")]
    pub group_ids: Vec<String>,

    #[serde(default, with = "bar_list")]
    pub gene_identifiers: Vec<String>,
}

/// Output row of `groupings.csv`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupingMembership {
    pub species_name: String,
    pub species_code: String,
    pub group_id: String,
    pub group_name: String,
    pub group_type: String,
    pub gene_identifier: String,
    pub reference_name: String,
    pub reference_file: String,
    pub reference_link: String,
}

#[derive(Debug, Clone, Default)]
pub struct GroupingStats {
    pub sources: usize,
    pub memberships: usize,
    pub groups: usize,
}

pub fn read_memberships(path: &Path) -> Result<Vec<MembershipRow>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| PgdError::config(format!("Cannot open grouping table {}: {}", path.display(), e)))?;
    Ok(reader
        .deserialize()
        .collect::<std::result::Result<Vec<MembershipRow>, csv::Error>>()?)
}

pub fn read_name_map(path: &Path) -> Result<HashMap<String, String>> {
    #[derive(Deserialize)]
    struct NameRow {
        group_id: String,
        #[serde(default)]
        group_name: String,
    }

    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| PgdError::config(format!("Cannot open name map {}: {}", path.display(), e)))?;
    let mut names = HashMap::new();
    for row in reader.deserialize::<NameRow>() {
        let row = row?;
        names.insert(row.group_id.trim().to_string(), row.group_name);
    }
    Ok(names)
}

/// Flatten membership rows into one row per (group id, gene identifier),
/// dropping repeats within the source.
pub fn explode(
    source: &GroupingSource,
    rows: &[MembershipRow],
    names: &HashMap<String, String>,
    species: &BTreeMap<String, String>,
) -> Vec<GroupingMembership> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for row in rows {
        let species_code = row.species.trim();
        for gene_identifier in &row.gene_identifiers {
            for group_id in &row.group_ids {
                if !seen.insert((species_code, group_id.as_str(), gene_identifier.as_str())) {
                    continue;
                }
                out.push(GroupingMembership {
                    species_name: species.get(species_code).cloned().unwrap_or_default(),
                    species_code: species_code.to_string(),
                    group_id: group_id.clone(),
                    group_name: names.get(group_id).cloned().unwrap_or_default(),
                    group_type: source.group_type.clone(),
                    gene_identifier: gene_identifier.clone(),
                    reference_name: source.reference_name.clone(),
                    reference_file: source.reference_file.clone(),
                    reference_link: source.reference_link.clone(),
                });
            }
        }
    }
    out
}

/// Load and flatten every configured source, in order
pub fn build_groupings(config: &GroupingsConfig) -> Result<Vec<GroupingMembership>> {
    let mut all = Vec::new();
    for source in &config.sources {
        let rows = read_memberships(&source.path)?;
        let names = match &source.name_map {
            Some(path) => read_name_map(path)?,
            None => HashMap::new(),
        };
        let memberships = explode(source, &rows, &names, &config.species);
        info!(
            source = %source.path.display(),
            group_type = %source.group_type,
            rows = rows.len(),
            memberships = memberships.len(),
            "Flattened grouping source"
        );
        all.extend(memberships);
    }
    Ok(all)
}

/// Columns of `groupings.csv`, in field order of [`GroupingMembership`]
pub const GROUPING_COLUMNS: [&str; 9] = [
    "species_name",
    "species_code",
    "group_id",
    "group_name",
    "group_type",
    "gene_identifier",
    "reference_name",
    "reference_file",
    "reference_link",
];

pub fn render_groupings(memberships: &[GroupingMembership]) -> Result<Vec<u8>> {
    // header written by hand so an empty table still has one
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(GROUPING_COLUMNS)?;
    for membership in memberships {
        writer.serialize(membership)?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// First `rows` memberships, ordered by species code
pub fn groupings_sample(memberships: &[GroupingMembership], rows: usize) -> Vec<GroupingMembership> {
    let mut sample: Vec<GroupingMembership> = memberships.iter().take(rows).cloned().collect();
    sample.sort_by(|a, b| a.species_code.cmp(&b.species_code));
    sample
}

/// Build `groupings.csv` and its sample. Nothing is written unless every
/// source loads.
pub fn run_groupings(config: &GroupingsConfig) -> Result<GroupingStats> {
    if config.sources.is_empty() {
        return Err(PgdError::config("No grouping sources configured"));
    }

    info!("Step 1/2: Flattening {} grouping sources...", config.sources.len());
    let memberships = build_groupings(config)?;
    let groups: HashSet<(&str, &str)> = memberships
        .iter()
        .map(|m| (m.species_code.as_str(), m.group_id.as_str()))
        .collect();

    info!("Step 2/2: Writing groupings...");
    let artifacts = [
        Artifact::new(&config.output, render_groupings(&memberships)?),
        Artifact::new(
            &config.sample_output,
            render_groupings(&groupings_sample(&memberships, config.sample_rows))?,
        ),
    ];
    for artifact in &artifacts {
        write_atomic(&artifact.path, &artifact.bytes)?;
    }

    let stats = GroupingStats {
        sources: config.sources.len(),
        memberships: memberships.len(),
        groups: groups.len(),
    };
    info!(
        memberships = stats.memberships,
        groups = stats.groups,
        output = %config.output.display(),
        "Groupings completed"
    );
    Ok(stats)
}
