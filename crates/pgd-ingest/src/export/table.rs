//! CSV/TSV rendering

use super::columns::Column;
use super::sample::{truncate_chars, SampleLimits};
use super::{write_atomic, Delimiter};
use pgd_common::types::GeneRecord;
use pgd_common::Result;
use std::path::Path;

/// Render `records` as a delimited table with a header row.
///
/// With `limits`, every cell is cut to its column's sample limit.
pub fn render_table<'a, I>(
    records: I,
    columns: &[Column],
    delimiter: Delimiter,
    limits: Option<&SampleLimits>,
) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a GeneRecord>,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|c| c.header()))?;
    for record in records {
        writer.write_record(columns.iter().map(|&column| {
            let cell = column.cell(record);
            match limits.and_then(|l| column.sample_limit(l)) {
                Some(limit) => truncate_chars(&cell, limit),
                None => cell,
            }
        }))?;
    }

    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Write `records` to `path` in one go.
pub fn write_table(path: &Path, records: &[GeneRecord], columns: &[Column], delimiter: Delimiter) -> Result<()> {
    let bytes = render_table(records, columns, delimiter, None)?;
    write_atomic(path, &bytes)
}
