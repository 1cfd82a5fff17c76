//! Tabular column pipeline: applies the field extractor to one designated
//! text column of a CSV table and writes the table back out widened with
//! the extracted field columns.
//!
//! The pipeline is deliberately thin. All decision logic lives in
//! [`InfoExtractor`](crate::rules::InfoExtractor); this module only reads
//! rows, delegates each info cell, appends the resulting columns, and
//! preserves input row order.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use tracing::info;

use crate::record::{FieldValue, ParsedFields, Record};
use crate::rules::InfoExtractor;

/// Error type for pipeline operations
#[derive(Debug)]
pub enum PipelineError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    MissingColumn { column: String },
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err)
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::Csv(err)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Json(err)
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io(e) => write!(f, "IO error: {}", e),
            PipelineError::Csv(e) => write!(f, "CSV error: {}", e),
            PipelineError::Json(e) => write!(f, "JSON error: {}", e),
            PipelineError::MissingColumn { column } => {
                write!(f, "Input table has no column named '{}'", column)
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// Output format for the widened table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Original columns plus the extracted columns, as CSV
    Csv,
    /// One JSON object per row merging original and extracted fields
    Ndjson,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "ndjson" => Ok(OutputFormat::Ndjson),
            other => Err(format!(
                "Unsupported output format: '{}'. Supported formats: csv, ndjson",
                other
            )),
        }
    }
}

/// Row and column counts reported after a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineReport {
    /// Data rows written (header excluded)
    pub rows: usize,
    /// Columns in the widened table
    pub columns: usize,
}

/// Parse one designated column of a CSV table and write the widened table.
///
/// Reads `input` (headers required), locates `column` by header name,
/// extracts [`ParsedFields`] from that cell on every row, and writes the
/// original columns plus the 13 extracted columns to `output` in the
/// requested format. Rows are processed and written in input order and
/// never skipped; extraction itself cannot fail, so the only error
/// surfaces are the designated column being absent and file/CSV I/O.
///
/// # Example
///
/// ```ignore
/// use pktinfo::{parse_table, OutputFormat};
///
/// let report = parse_table(
///     "capture.csv".as_ref(),
///     "parsed_capture.csv".as_ref(),
///     "Info",
///     OutputFormat::Csv,
/// )?;
/// println!("{} rows, {} columns", report.rows, report.columns);
/// ```
pub fn parse_table(
    input: &Path,
    output: &Path,
    column: &str,
    format: OutputFormat,
) -> Result<PipelineReport, PipelineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(input)?;

    let headers = reader.headers()?.clone();
    let info_idx = headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| PipelineError::MissingColumn {
            column: column.to_string(),
        })?;

    let extractor = InfoExtractor::new();

    let report = match format {
        OutputFormat::Csv => write_csv(&mut reader, &headers, info_idx, &extractor, output)?,
        OutputFormat::Ndjson => write_ndjson(&mut reader, &headers, info_idx, &extractor, output)?,
    };

    info!(
        rows = report.rows,
        columns = report.columns,
        output = %output.display(),
        "parsed info column '{}'",
        column
    );

    Ok(report)
}

fn write_csv(
    reader: &mut csv::Reader<File>,
    headers: &csv::StringRecord,
    info_idx: usize,
    extractor: &InfoExtractor,
    output: &Path,
) -> Result<PipelineReport, PipelineError> {
    let mut writer = csv::WriterBuilder::new().from_path(output)?;

    let mut out_header: Vec<&str> = headers.iter().collect();
    out_header.extend(ParsedFields::COLUMNS);
    writer.write_record(&out_header)?;

    let mut rows = 0;
    for result in reader.records() {
        let row = result?;
        let fields = extractor.extract(row.get(info_idx).unwrap_or(""));

        let mut cells: Vec<String> = row.iter().map(str::to_string).collect();
        cells.extend(fields.csv_cells());
        writer.write_record(&cells)?;
        rows += 1;
    }
    writer.flush()?;

    Ok(PipelineReport {
        rows,
        columns: headers.len() + ParsedFields::COLUMNS.len(),
    })
}

/// NDJSON rows merge the original columns (as strings) with the typed
/// extracted fields. On a column-name collision the extracted value wins.
fn write_ndjson(
    reader: &mut csv::Reader<File>,
    headers: &csv::StringRecord,
    info_idx: usize,
    extractor: &InfoExtractor,
    output: &Path,
) -> Result<PipelineReport, PipelineError> {
    let mut writer = BufWriter::new(File::create(output)?);

    let mut rows = 0;
    for result in reader.records() {
        let row = result?;
        let fields = extractor.extract(row.get(info_idx).unwrap_or(""));

        let mut merged: IndexMap<String, FieldValue> = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| (header.to_string(), FieldValue::Str(cell.to_string())))
            .collect();
        for (name, value) in fields.to_dict() {
            merged.insert(name, value);
        }

        let json = serde_json::to_string(&merged)?;
        writeln!(writer, "{}", json)?;
        rows += 1;
    }
    writer.flush()?;

    Ok(PipelineReport {
        rows,
        columns: headers.len() + ParsedFields::COLUMNS.len(),
    })
}
