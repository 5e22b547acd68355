//! Delimited-file reading and writing.
//!
//! Everything that touches disk or the standard streams lives here; the
//! pipeline modules only see in-memory [`Table`]s.
//!
//! - **Delimiter resolution**: `.tsv` maps to tab, anything else to comma,
//!   unless overridden.
//! - **Encoding**: input is decoded with `encoding_rs`, defaulting to UTF-8.
//!   Output is always UTF-8.
//! - **stdin/stdout**: the `-` path routes through the standard streams.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};

use crate::data::Table;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| delimiter_for_extension(path).unwrap_or(DEFAULT_CSV_DELIMITER))
}

pub fn resolve_output_delimiter(path: Option<&Path>, provided: Option<u8>, fallback: u8) -> u8 {
    provided
        .or_else(|| path.and_then(delimiter_for_extension))
        .unwrap_or(fallback)
}

fn delimiter_for_extension(path: &Path) -> Option<u8> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => Some(DEFAULT_TSV_DELIMITER),
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Some(DEFAULT_CSV_DELIMITER),
        _ => None,
    }
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false);
    builder.from_reader(reader)
}

pub fn open_csv_reader_from_path(path: &Path, delimiter: u8) -> Result<csv::Reader<Box<dyn Read>>> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    Ok(open_csv_reader(reader, delimiter))
}

pub fn open_csv_writer(path: Option<&Path>, delimiter: u8) -> Result<csv::Writer<Box<dyn Write>>> {
    let writer: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    };

    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true);
    Ok(builder.from_writer(writer))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<String>>
where
    R: Read,
{
    let headers = reader.byte_headers()?.clone();
    decode_record(&headers, encoding)
}

/// Reads a whole delimited file into memory. `limit` caps the number of data
/// rows read.
pub fn read_table(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
    limit: Option<usize>,
) -> Result<Table> {
    let mut reader = open_csv_reader_from_path(path, delimiter)?;
    let headers = reader_headers(&mut reader, encoding)
        .with_context(|| format!("Reading headers from {path:?}"))?;
    let mut records = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        if limit.is_some_and(|limit| row_idx >= limit) {
            break;
        }
        let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
        records.push(decode_record(&record, encoding)?);
    }
    Ok(Table::from_records(headers, records))
}

pub fn write_table(path: Option<&Path>, table: &Table, delimiter: u8) -> Result<()> {
    let mut writer = open_csv_writer(path, delimiter)?;
    writer
        .write_record(&table.headers)
        .context("Writing output headers")?;
    for (idx, row) in table.display_rows().iter().enumerate() {
        writer
            .write_record(row)
            .with_context(|| format!("Writing output row {}", idx + 2))?;
    }
    writer.flush().context("Flushing output writer")?;
    Ok(())
}
