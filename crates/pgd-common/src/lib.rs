//! PGD Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the PGD workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`PgdError`] and the crate-wide [`Result`] alias
//! - **Logging**: `tracing` subscriber setup shared by every binary
//! - **Types**: input rows, output records and pipe-delimited list helpers
//!
//! # Example
//!
//! ```no_run
//! use pgd_common::types::{bar_split, GeneRow};
//!
//! let ids = bar_split("AT1G01010| ABC1 ||");
//! assert_eq!(ids, vec!["AT1G01010", "ABC1"]);
//! let row = GeneRow { species_code: "ath".into(), unique_gene_identifiers: ids, ..Default::default() };
//! assert!(!row.has_text());
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{PgdError, Result};
