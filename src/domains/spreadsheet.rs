//! Tabular reinterpretation between delimited text and workbook formats.
//!
//! Every spreadsheet conversion goes through one intermediate: a
//! `Vec<Vec<String>>` of cell text in row/column order. No formula
//! evaluation, no type inference — cell text in, cell text out, column order
//! preserved. Multi-sheet workbooks are read from the first sheet only.

use crate::catalog::Format;
use crate::error::FlexifileError;
use crate::output::{Artifact, Outcome};
use crate::registry::Staged;
use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;
use tracing::debug;

/// Handler for all spreadsheet pairs: parse to a string table, re-emit.
pub fn reinterpret(staged: &Staged<'_>) -> Result<Outcome, FlexifileError> {
    let rows = read_table(staged.bytes, staged.input)?;
    debug!("Parsed {} table: {} rows", staged.input, rows.len());

    let bytes = write_table(&rows, staged.output)?;
    let filename = format!("{}{}", staged.stem, staged.output.extension());
    Ok(Outcome::single(Artifact::new(filename, bytes)))
}

/// Parse the input into rows of cell text.
fn read_table(bytes: &[u8], input: Format) -> Result<Vec<Vec<String>>, FlexifileError> {
    match input {
        Format::Csv => read_delimited(bytes, b',', input),
        Format::Tsv => read_delimited(bytes, b'\t', input),
        Format::Xlsx => read_workbook(bytes),
        other => Err(FlexifileError::Internal(format!(
            "spreadsheet reader has no rule for {other}"
        ))),
    }
}

/// Serialise rows into the output format.
fn write_table(rows: &[Vec<String>], output: Format) -> Result<Vec<u8>, FlexifileError> {
    match output {
        Format::Csv => write_delimited(rows, b','),
        Format::Tsv => write_delimited(rows, b'\t'),
        Format::Xlsx => write_workbook(rows),
        other => Err(FlexifileError::Internal(format!(
            "spreadsheet writer has no rule for {other}"
        ))),
    }
}

fn read_delimited(
    bytes: &[u8],
    delimiter: u8,
    input: Format,
) -> Result<Vec<Vec<String>>, FlexifileError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| FlexifileError::MalformedInput {
            format: input,
            detail: e.to_string(),
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn write_delimited(rows: &[Vec<String>], delimiter: u8) -> Result<Vec<u8>, FlexifileError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(Vec::new());

    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| FlexifileError::ConversionFailed {
                detail: format!("delimited output: {e}"),
            })?;
    }
    writer
        .into_inner()
        .map_err(|e| FlexifileError::ConversionFailed {
            detail: format!("delimited output: {e}"),
        })
}

/// Read the first (default) sheet of an xlsx workbook as cell text.
fn read_workbook(bytes: &[u8]) -> Result<Vec<Vec<String>>, FlexifileError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes.to_vec())).map_err(|e| FlexifileError::MalformedInput {
            format: Format::Xlsx,
            detail: e.to_string(),
        })?;

    // First sheet only; additional sheets are out of scope by design.
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| FlexifileError::MalformedInput {
            format: Format::Xlsx,
            detail: "workbook has no sheets".into(),
        })?
        .map_err(|e| FlexifileError::MalformedInput {
            format: Format::Xlsx,
            detail: e.to_string(),
        })?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok(rows)
}

fn write_workbook(rows: &[Vec<String>]) -> Result<Vec<u8>, FlexifileError> {
    let failed = |e: rust_xlsxwriter::XlsxError| FlexifileError::ConversionFailed {
        detail: format!("xlsx output: {e}"),
    };

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            // Everything is written as text so the cell representation
            // survives a roundtrip unchanged.
            worksheet
                .write_string(r as u32, c as u16, cell)
                .map_err(failed)?;
        }
    }
    workbook.save_to_buffer().map_err(failed)
}

/// Render one calamine cell as text.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
