//! Per-group aggregation of identifier lists

use pgd_common::types::{bar_concat, GeneRow};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One resolved gene: every row connected through shared unique identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneGroup {
    pub id: usize,

    /// Member rows, as indices into the merged input, ascending
    pub rows: Vec<usize>,

    /// Non-gene-model identifiers in first-seen order, then the gene models
    pub unique_gene_identifiers: Vec<String>,

    /// Ambiguous aliases, never overlapping the unique list
    pub other_gene_identifiers: Vec<String>,

    pub gene_models: Vec<String>,
}

/// Member lists of one group, in row order, before deduplication
#[derive(Debug, Default)]
struct Accumulator<'a> {
    rows: Vec<usize>,
    unique: Vec<&'a str>,
    other: Vec<&'a str>,
    gene_models: Vec<&'a str>,
}

/// Drop every alias that is also a unique identifier or a gene model.
pub fn remove_promoted(other: Vec<String>, unique: &[String], gene_models: &[String]) -> Vec<String> {
    let promoted: HashSet<&str> = unique
        .iter()
        .chain(gene_models)
        .map(String::as_str)
        .collect();
    other
        .into_iter()
        .filter(|id| !promoted.contains(id.as_str()))
        .collect()
}

/// Put gene models last: the unique identifiers that are not gene models keep
/// their order, then every gene model follows in its own order.
pub fn reorder_unique(unique: Vec<String>, gene_models: &[String]) -> Vec<String> {
    let models: HashSet<&str> = gene_models.iter().map(String::as_str).collect();
    let mut reordered: Vec<String> = unique
        .into_iter()
        .filter(|id| !models.contains(id.as_str()))
        .collect();
    reordered.extend(gene_models.iter().cloned());
    reordered
}

/// Collapse the rows of each group into one [`GeneGroup`].
///
/// `assignments[i]` is the group of `rows[i]`; group ids must be dense
/// (`0..group_count`), which [`super::graph::label_components`] guarantees.
/// Groups come back ordered by id.
pub fn aggregate_groups(rows: &[GeneRow], assignments: &[usize]) -> Vec<GeneGroup> {
    let group_count = assignments.iter().max().map_or(0, |max| max + 1);
    let mut accumulators: Vec<Accumulator> = (0..group_count).map(|_| Accumulator::default()).collect();

    for (row_id, (row, &group)) in rows.iter().zip(assignments).enumerate() {
        let acc = &mut accumulators[group];
        acc.rows.push(row_id);
        acc.unique.extend(row.unique_gene_identifiers.iter().map(String::as_str));
        acc.other.extend(row.other_gene_identifiers.iter().map(String::as_str));
        acc.gene_models.extend(row.gene_models.iter().map(String::as_str));
    }

    accumulators
        .into_iter()
        .enumerate()
        .map(|(id, acc)| {
            let gene_models = bar_concat(acc.gene_models);
            let unique = bar_concat(acc.unique);
            let other = remove_promoted(bar_concat(acc.other), &unique, &gene_models);
            let unique = reorder_unique(unique, &gene_models);
            GeneGroup {
                id,
                rows: acc.rows,
                unique_gene_identifiers: unique,
                other_gene_identifiers: other,
                gene_models,
            }
        })
        .collect()
}
