//! Row/token graph and connected-component labeling
//!
//! Every row is a node, every distinct namespaced identifier token is a node,
//! and a row is linked to each of its tokens. Two rows end up in the same
//! component exactly when a chain of shared tokens connects them.

use super::union_find::DisjointSet;
use super::MergeOptions;
use pgd_common::types::GeneRow;
use std::collections::HashMap;
use tracing::debug;

/// Namespaced matching tokens for one row, in identifier order.
///
/// Only the unique identifiers participate. Tokens are
/// `species_code + separator + identifier`, with the identifier lowercased
/// unless matching is case sensitive. Duplicates within a row are kept; they
/// collapse onto one node when added to the graph.
pub fn row_tokens(row: &GeneRow, options: &MergeOptions) -> Vec<String> {
    row.unique_gene_identifiers
        .iter()
        .map(|id| {
            let id = if options.case_sensitive {
                id.clone()
            } else {
                id.to_lowercase()
            };
            format!("{}{}{}", row.species_code, options.separator, id)
        })
        .collect()
}

/// Bipartite row/token graph held as a disjoint-set forest.
///
/// Rows take ids `0..row_count`; tokens take the following ids in order of
/// first sight.
#[derive(Debug, Clone)]
pub struct TokenGraph {
    set: DisjointSet,
    row_count: usize,
    tokens: HashMap<String, usize>,
}

impl TokenGraph {
    pub fn build(rows: &[GeneRow], options: &MergeOptions) -> Self {
        let mut graph = Self {
            set: DisjointSet::with_len(rows.len()),
            row_count: rows.len(),
            tokens: HashMap::new(),
        };

        for (row_id, row) in rows.iter().enumerate() {
            for token in row_tokens(row, options) {
                let token_id = graph.token_node(token);
                graph.set.union(row_id, token_id);
            }
        }

        debug!(
            rows = graph.row_count,
            tokens = graph.tokens.len(),
            "Built identifier token graph"
        );
        graph
    }

    fn token_node(&mut self, token: String) -> usize {
        if let Some(&id) = self.tokens.get(&token) {
            return id;
        }
        let id = self.set.make_set();
        self.tokens.insert(token, id);
        id
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Node id of a token, if any row produced it
    pub fn token_id(&self, token: &str) -> Option<usize> {
        self.tokens.get(token).copied()
    }

    /// Whether two rows fall in the same connected component
    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.set.same_set(a, b)
    }

    /// Assign a group id to every row.
    ///
    /// Ids are dense from 0 and handed out in order of the first row of each
    /// component, so the labeling depends only on the input order.
    pub fn label_components(&mut self) -> Vec<usize> {
        let mut group_of_root: HashMap<usize, usize> = HashMap::new();
        let mut labels = Vec::with_capacity(self.row_count);
        for row_id in 0..self.row_count {
            let root = self.set.find(row_id);
            let next = group_of_root.len();
            labels.push(*group_of_root.entry(root).or_insert(next));
        }
        labels
    }
}

/// Build the graph for `rows` and label its components in one go.
pub fn label_components(rows: &[GeneRow], options: &MergeOptions) -> Vec<usize> {
    TokenGraph::build(rows, options).label_components()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn row(species: &str, ids: &[&str]) -> GeneRow {
        GeneRow {
            species_code: species.to_string(),
            unique_gene_identifiers: ids.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_tokens_are_namespaced_and_lowercased() {
        let r = row("ath", &["AT1G01010", "NAC001"]);
        let tokens = row_tokens(&r, &MergeOptions::default());
        assert_eq!(tokens, vec!["ath[SEP]at1g01010", "ath[SEP]nac001"]);

        let sensitive = MergeOptions { case_sensitive: true, ..Default::default() };
        assert_eq!(row_tokens(&r, &sensitive)[0], "ath[SEP]AT1G01010");
    }

    #[test]
    fn test_tokens_are_shared_once() {
        let rows = vec![row("ath", &["A", "B"]), row("ath", &["b"]), row("zma", &["A"])];
        let graph = TokenGraph::build(&rows, &MergeOptions::default());
        assert_eq!(graph.row_count(), 3);
        assert_eq!(graph.token_count(), 3);
        assert!(graph.token_id("ath[SEP]b").is_some());
        assert!(graph.token_id("ath[SEP]B").is_none());
    }

    #[test]
    fn test_chain_links_rows_without_direct_overlap() {
        let rows = vec![
            row("ath", &["A", "B"]),
            row("ath", &["B", "C"]),
            row("ath", &["C", "D"]),
            row("ath", &["E"]),
        ];
        assert_eq!(label_components(&rows, &MergeOptions::default()), vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_labels_follow_first_row_order() {
        let rows = vec![
            row("ath", &["X"]),
            row("ath", &["Y"]),
            row("ath", &[]),
            row("ath", &["x"]),
        ];
        assert_eq!(label_components(&rows, &MergeOptions::default()), vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_rows_without_identifiers_are_singletons() {
        let rows = vec![row("ath", &[]), row("ath", &[])];
        assert_eq!(label_components(&rows, &MergeOptions::default()), vec![0, 1]);
    }

    #[test]
    fn test_empty_input() {
        assert!(label_components(&[], &MergeOptions::default()).is_empty());
    }
}
