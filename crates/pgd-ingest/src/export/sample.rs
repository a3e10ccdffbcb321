//! Truncated preview variants of the output files

use serde::{Deserialize, Serialize};

/// Row counts and per-column limits for sample files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleLimits {
    /// Leading rows kept in CSV/TSV samples
    pub rows: usize,

    pub unique_chars: usize,
    pub other_chars: usize,
    pub gene_model_chars: usize,
    pub text_chars: usize,
    pub annotation_chars: usize,
    pub annotation_nc_chars: usize,

    /// Leading genes kept in the JSON sample
    pub json_genes: usize,

    /// Items kept per list in the JSON sample
    pub json_list_items: usize,

    /// Characters kept per text field in the JSON sample
    pub json_text_chars: usize,
}

impl Default for SampleLimits {
    fn default() -> Self {
        Self {
            rows: 100,
            unique_chars: 30,
            other_chars: 20,
            gene_model_chars: 30,
            text_chars: 100,
            annotation_chars: 60,
            annotation_nc_chars: 60,
            json_genes: 100,
            json_list_items: 4,
            json_text_chars: 100,
        }
    }
}

/// Cut `text` to `limit` characters, marking the cut with `...`
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte, _)) => format!("{}...", &text[..byte]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("AT1G01010|NAC001", 9), "AT1G01010...");
        assert_eq!(truncate_chars("short", 5), "short");
        assert_eq!(truncate_chars("", 0), "");
        assert_eq!(truncate_chars("naïve", 3), "naï...");
    }
}
