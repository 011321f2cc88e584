//! CSV serialization of findings
//!
//! Rows are written with RFC 4180 quoting, sorted by type (email, phone,
//! info) and then by value.

use crate::output::{OutputResult, Record};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column names, in order
pub const CSV_HEADER: [&str; 8] = [
    "type",
    "value",
    "domain",
    "source_url",
    "source_type",
    "page_title",
    "snippet",
    "first_seen",
];

/// Quotes a field when it contains a delimiter, quote or line break
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Sorts records into output order
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(|a, b| {
        a.record_type
            .cmp(&b.record_type)
            .then_with(|| a.value.cmp(&b.value))
    });
}

/// Writes header and rows to any writer
///
/// An empty record list yields a single `no_hits` info row.
///
/// # Returns
///
/// The number of rows written, excluding the header
pub fn write_csv<W: Write>(writer: &mut W, records: &[Record]) -> OutputResult<usize> {
    let mut rows: Vec<Record> = if records.is_empty() {
        vec![Record::no_hits()]
    } else {
        records.to_vec()
    };
    sort_records(&mut rows);

    write_row(writer, CSV_HEADER.iter().copied())?;
    for record in &rows {
        let fields = record.fields();
        write_row(writer, fields.iter().map(String::as_str))?;
    }
    writer.flush()?;

    Ok(rows.len())
}

/// Writes the CSV to a file, replacing it if it exists
pub fn write_csv_file(path: &Path, records: &[Record]) -> OutputResult<usize> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let rows = write_csv(&mut writer, records)?;
    tracing::info!("Wrote {} row(s) to {}", rows, path.display());
    Ok(rows)
}

fn write_row<'a, W: Write>(
    writer: &mut W,
    fields: impl Iterator<Item = &'a str>,
) -> OutputResult<()> {
    let line = fields.map(escape_field).collect::<Vec<_>>().join(",");
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\r\n")?;
    Ok(())
}
