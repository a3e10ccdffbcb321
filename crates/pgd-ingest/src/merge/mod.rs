//! Gene identity resolution
//!
//! Rows from different sources describe the same gene when they are
//! connected through shared unique identifiers. Resolution runs in three
//! passes:
//!
//! 1. [`graph::TokenGraph::build`] links every row to its namespaced
//!    identifier tokens (`ath[SEP]abc1`).
//! 2. [`graph::TokenGraph::label_components`] gives every row a group id.
//! 3. [`aggregate::aggregate_groups`] unions the identifier lists of each
//!    group, drops aliases that were confirmed as unique identifiers and moves
//!    gene models to the back of the unique list.
//!
//! Matching may ignore case, but stored identifiers always keep the casing
//! they arrived with.
//!
//! # Example
//!
//! ```
//! use pgd_common::types::GeneRow;
//! use pgd_ingest::merge::{merge_rows, MergeOptions};
//!
//! let row = |species: &str, ids: &[&str]| GeneRow {
//!     species_code: species.to_string(),
//!     unique_gene_identifiers: ids.iter().map(|s| s.to_string()).collect(),
//!     ..Default::default()
//! };
//! let rows = vec![
//!     row("ath", &["AT1G01010", "ABC1"]),
//!     row("ath", &["abc1", "FOO"]),
//!     row("zma", &["ABC1"]),
//! ];
//!
//! let outcome = merge_rows(&rows, &MergeOptions::default());
//! assert_eq!(outcome.assignments, vec![0, 0, 1]);
//! assert_eq!(outcome.groups.len(), 2);
//! ```

pub mod aggregate;
pub mod graph;
pub mod union_find;

pub use aggregate::{aggregate_groups, reorder_unique, remove_promoted, GeneGroup};
pub use graph::{label_components, row_tokens, TokenGraph};
pub use union_find::DisjointSet;

use pgd_common::types::{GeneRecord, GeneRow};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Sentinel placed between species code and identifier in a graph token
pub const DEFAULT_SEPARATOR: &str = "[SEP]";

/// Matching options for identity resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Treat identifiers differing only in case as distinct
    pub case_sensitive: bool,

    /// Namespace separator; must not occur in species codes
    pub separator: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

/// Result of [`merge_rows`]
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Group id of every input row, by row index
    pub assignments: Vec<usize>,

    /// Resolved groups, ordered by id
    pub groups: Vec<GeneGroup>,

    /// One record per input row, in input order, carrying its group's lists.
    /// Tokenized text and recognizer annotations are left empty.
    pub records: Vec<GeneRecord>,
}

impl MergeOutcome {
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Largest number of rows folded into one group
    pub fn largest_group(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).max().unwrap_or(0)
    }
}

/// Resolve gene identities across `rows` and build the merged records.
pub fn merge_rows(rows: &[GeneRow], options: &MergeOptions) -> MergeOutcome {
    let outside_unique = rows
        .iter()
        .filter(|row| {
            row.gene_models
                .iter()
                .any(|model| !row.unique_gene_identifiers.contains(model))
        })
        .count();
    if outside_unique > 0 {
        debug!(rows = outside_unique, "Rows list gene models absent from their unique identifiers");
    }

    let assignments = label_components(rows, options);
    let groups = aggregate_groups(rows, &assignments);

    let records = rows
        .iter()
        .zip(&assignments)
        .map(|(row, &group_id)| to_record(row, &groups[group_id]))
        .collect();

    let outcome = MergeOutcome {
        assignments,
        groups,
        records,
    };
    info!(
        rows = rows.len(),
        groups = outcome.group_count(),
        largest_group = outcome.largest_group(),
        case_sensitive = options.case_sensitive,
        "Resolved gene identities"
    );
    outcome
}

fn to_record(row: &GeneRow, group: &GeneGroup) -> GeneRecord {
    GeneRecord {
        gene_id: group.id,
        species_name: row.species_name.clone(),
        species_code: row.species_code.clone(),
        unique_gene_identifiers: group.unique_gene_identifiers.clone(),
        other_gene_identifiers: group.other_gene_identifiers.clone(),
        gene_models: group.gene_models.clone(),
        annotations: row.annotations.clone(),
        text_unprocessed: row.text_unprocessed.clone(),
        reference_name: row.reference_name.clone(),
        reference_link: row.reference_link.clone(),
        reference_file: row.reference_file.clone(),
        ..Default::default()
    }
}
