//! Output column model

use super::sample::SampleLimits;
use pgd_common::types::{bar_join, GeneRecord};

/// One column of an output table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    GeneId,
    /// Same value as `GeneId`, named for merge-only output
    GroupId,
    SpeciesName,
    SpeciesCode,
    UniqueGeneIdentifiers,
    OtherGeneIdentifiers,
    GeneModels,
    Annotations,
    AnnotationsNc,
    TextUnprocessed,
    TextTokenizedSents,
    TextTokenizedWords,
    TextTokenizedStems,
    ReferenceName,
    ReferenceLink,
    ReferenceFile,
}

use Column::*;

impl Column {
    /// Every column of the final dataset, in file order
    pub const ALL: [Column; 15] = [
        GeneId,
        SpeciesName,
        SpeciesCode,
        UniqueGeneIdentifiers,
        OtherGeneIdentifiers,
        GeneModels,
        Annotations,
        AnnotationsNc,
        TextUnprocessed,
        TextTokenizedSents,
        TextTokenizedWords,
        TextTokenizedStems,
        ReferenceName,
        ReferenceLink,
        ReferenceFile,
    ];

    /// Sample of the text subset: curated annotations left out
    pub const TEXTS_SAMPLE: [Column; 14] = [
        GeneId,
        SpeciesName,
        SpeciesCode,
        UniqueGeneIdentifiers,
        OtherGeneIdentifiers,
        GeneModels,
        AnnotationsNc,
        TextUnprocessed,
        TextTokenizedSents,
        TextTokenizedWords,
        TextTokenizedStems,
        ReferenceName,
        ReferenceLink,
        ReferenceFile,
    ];

    /// Sample of the annotation subset: text and recognizer output left out
    pub const ANNOTATIONS_SAMPLE: [Column; 10] = [
        GeneId,
        SpeciesName,
        SpeciesCode,
        UniqueGeneIdentifiers,
        OtherGeneIdentifiers,
        GeneModels,
        Annotations,
        ReferenceName,
        ReferenceLink,
        ReferenceFile,
    ];

    /// Merge-only output: group ids next to the original row content
    pub const MERGED: [Column; 11] = [
        GroupId,
        SpeciesName,
        SpeciesCode,
        UniqueGeneIdentifiers,
        OtherGeneIdentifiers,
        GeneModels,
        TextUnprocessed,
        Annotations,
        ReferenceName,
        ReferenceLink,
        ReferenceFile,
    ];

    pub fn header(self) -> &'static str {
        match self {
            GeneId => "gene_id",
            GroupId => "group_id",
            SpeciesName => "species_name",
            SpeciesCode => "species_code",
            UniqueGeneIdentifiers => "unique_gene_identifiers",
            OtherGeneIdentifiers => "other_gene_identifiers",
            GeneModels => "gene_models",
            Annotations => "annotations",
            AnnotationsNc => "annotations_nc",
            TextUnprocessed => "text_unprocessed",
            TextTokenizedSents => "text_tokenized_sents",
            TextTokenizedWords => "text_tokenized_words",
            TextTokenizedStems => "text_tokenized_stems",
            ReferenceName => "reference_name",
            ReferenceLink => "reference_link",
            ReferenceFile => "reference_file",
        }
    }

    /// Cell text for `record`; list columns are pipe-joined
    pub fn cell(self, record: &GeneRecord) -> String {
        match self {
            GeneId | GroupId => record.gene_id.to_string(),
            SpeciesName => record.species_name.clone(),
            SpeciesCode => record.species_code.clone(),
            UniqueGeneIdentifiers => bar_join(&record.unique_gene_identifiers),
            OtherGeneIdentifiers => bar_join(&record.other_gene_identifiers),
            GeneModels => bar_join(&record.gene_models),
            Annotations => bar_join(&record.annotations),
            AnnotationsNc => bar_join(&record.annotations_nc),
            TextUnprocessed => record.text_unprocessed.clone(),
            TextTokenizedSents => record.text_tokenized_sents.clone(),
            TextTokenizedWords => record.text_tokenized_words.clone(),
            TextTokenizedStems => record.text_tokenized_stems.clone(),
            ReferenceName => record.reference_name.clone(),
            ReferenceLink => record.reference_link.clone(),
            ReferenceFile => record.reference_file.clone(),
        }
    }

    /// Character limit applied to this column in sample files
    pub fn sample_limit(self, limits: &SampleLimits) -> Option<usize> {
        match self {
            UniqueGeneIdentifiers => Some(limits.unique_chars),
            OtherGeneIdentifiers => Some(limits.other_chars),
            GeneModels => Some(limits.gene_model_chars),
            Annotations => Some(limits.annotation_chars),
            AnnotationsNc => Some(limits.annotation_nc_chars),
            TextUnprocessed | TextTokenizedSents | TextTokenizedWords | TextTokenizedStems => {
                Some(limits.text_chars)
            },
            _ => None,
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}
