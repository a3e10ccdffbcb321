//! JSON rendering
//!
//! The full file is a pretty-printed array of genes with every pipe-delimited
//! field split back into an array. The sample keeps the first genes only,
//! shortens lists and text, and prints each list on one line.

use super::sample::{truncate_chars, SampleLimits};
use pgd_common::types::GeneRecord;
use pgd_common::Result;
use serde::Serialize;
use std::io;

/// One gene as it appears in the JSON files
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonGene {
    pub gene_id: usize,
    pub species_code: String,
    pub species_name: String,
    pub unique_gene_identifiers: Vec<String>,
    pub other_gene_identifiers: Vec<String>,
    pub gene_models: Vec<String>,
    pub text_unprocessed: String,
    pub text_tokenized_sents: String,
    pub text_tokenized_words: String,
    pub text_tokenized_stems: String,
    pub annotations: Vec<String>,
    pub annotations_nc: Vec<String>,
    pub reference_name: String,
    pub reference_file: String,
    pub reference_link: String,
}

impl From<&GeneRecord> for JsonGene {
    fn from(record: &GeneRecord) -> Self {
        Self {
            gene_id: record.gene_id,
            species_code: record.species_code.clone(),
            species_name: record.species_name.clone(),
            unique_gene_identifiers: record.unique_gene_identifiers.clone(),
            other_gene_identifiers: record.other_gene_identifiers.clone(),
            gene_models: record.gene_models.clone(),
            text_unprocessed: record.text_unprocessed.clone(),
            text_tokenized_sents: record.text_tokenized_sents.clone(),
            text_tokenized_words: record.text_tokenized_words.clone(),
            text_tokenized_stems: record.text_tokenized_stems.clone(),
            annotations: record.annotations.clone(),
            annotations_nc: record.annotations_nc.clone(),
            reference_name: record.reference_name.clone(),
            reference_file: record.reference_file.clone(),
            reference_link: record.reference_link.clone(),
        }
    }
}

impl JsonGene {
    fn truncated(mut self, limits: &SampleLimits) -> Self {
        for list in [
            &mut self.unique_gene_identifiers,
            &mut self.other_gene_identifiers,
            &mut self.gene_models,
            &mut self.annotations,
            &mut self.annotations_nc,
        ] {
            list.truncate(limits.json_list_items);
        }
        for text in [
            &mut self.text_unprocessed,
            &mut self.text_tokenized_sents,
            &mut self.text_tokenized_words,
            &mut self.text_tokenized_stems,
        ] {
            *text = truncate_chars(text, limits.json_text_chars);
        }
        self
    }
}

pub fn to_json_genes(records: &[GeneRecord]) -> Vec<JsonGene> {
    records.iter().map(JsonGene::from).collect()
}

/// Full JSON file, indented by four spaces
pub fn render_json(records: &[GeneRecord]) -> Result<Vec<u8>> {
    let genes = to_json_genes(records);
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    genes.serialize(&mut serializer)?;
    Ok(out)
}

/// JSON sample with shortened content and one-line lists
pub fn render_json_sample(records: &[GeneRecord], limits: &SampleLimits) -> Result<Vec<u8>> {
    let genes: Vec<JsonGene> = records
        .iter()
        .take(limits.json_genes)
        .map(|record| JsonGene::from(record).truncated(limits))
        .collect();
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, InlineListFormatter::new(b"    "));
    genes.serialize(&mut serializer)?;
    Ok(out)
}

/// Pretty printer that keeps arrays nested inside objects on one line
#[derive(Debug)]
struct InlineListFormatter<'a> {
    indent: &'a [u8],
    level: usize,
    has_value: bool,
    /// One entry per open container; true for inline arrays
    inline: Vec<bool>,
}

impl<'a> InlineListFormatter<'a> {
    fn new(indent: &'a [u8]) -> Self {
        Self {
            indent,
            level: 0,
            has_value: false,
            inline: Vec::new(),
        }
    }

    fn in_inline(&self) -> bool {
        self.inline.last().copied().unwrap_or(false)
    }

    fn newline<W: ?Sized + io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b"\n")?;
        for _ in 0..self.level {
            writer.write_all(self.indent)?;
        }
        Ok(())
    }
}

impl serde_json::ser::Formatter for InlineListFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        let inline = !self.inline.is_empty();
        self.inline.push(inline);
        if !inline {
            self.level += 1;
        }
        self.has_value = false;
        writer.write_all(b"[")
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        let inline = self.inline.pop().unwrap_or(false);
        if !inline {
            self.level = self.level.saturating_sub(1);
            if self.has_value {
                self.newline(writer)?;
            }
        }
        writer.write_all(b"]")
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if self.in_inline() {
            if !first {
                writer.write_all(b", ")?;
            }
            return Ok(());
        }
        if !first {
            writer.write_all(b",")?;
        }
        self.newline(writer)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inline.push(false);
        self.level += 1;
        self.has_value = false;
        writer.write_all(b"{")
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inline.pop();
        self.level = self.level.saturating_sub(1);
        if self.has_value {
            self.newline(writer)?;
        }
        writer.write_all(b"}")
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if !first {
            writer.write_all(b",")?;
        }
        self.newline(writer)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }
}
