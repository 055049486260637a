// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Flat comma-delimited text for the record list.
//!
//! The default [`CsvDialect::Naive`] joins and splits on a literal comma with
//! no quoting, so values containing commas shift the columns that follow.
//! [`CsvDialect::Quoted`] is an opt-in RFC 4180 dialect that quotes such values.

use ::csv::{ReaderBuilder, Terminator, WriterBuilder};
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::{HighlightField, HighlightRecord};

pub const CSV_HEADER: &str = "User,Status,Group,Details,Date,Category,Activity";
pub const CSV_FILE_NAME: &str = "highlights.csv";
pub const CSV_MIME_TYPE: &str = "text/csv";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvDialect {
    #[default]
    Naive,
    Quoted,
}

impl CsvDialect {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Naive => "naive",
            Self::Quoted => "quoted",
        }
    }
}

pub fn encode(records: &[HighlightRecord]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + records.len() * 64);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for record in records {
        let line = HighlightField::ALL
            .iter()
            .map(|field| record.field(*field))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Parses naive CSV text, dropping the first line as the header.
///
/// Blank lines never produce records, including blank lines between rows.
/// Missing trailing columns become empty strings and columns past the
/// seventh are ignored.
pub fn decode(text: &str) -> Vec<HighlightRecord> {
    text.trim()
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| record_from_columns(line.split(',')))
        .collect()
}

pub fn encode_with(records: &[HighlightRecord], dialect: CsvDialect) -> Result<String> {
    match dialect {
        CsvDialect::Naive => Ok(encode(records)),
        CsvDialect::Quoted => encode_quoted(records),
    }
}

pub fn decode_with(text: &str, dialect: CsvDialect) -> Result<Vec<HighlightRecord>> {
    match dialect {
        CsvDialect::Naive => Ok(decode(text)),
        CsvDialect::Quoted => decode_quoted(text),
    }
}

fn encode_quoted(records: &[HighlightRecord]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER.split(','))
        .context("write CSV header")?;
    for record in records {
        writer
            .write_record(HighlightField::ALL.iter().map(|field| record.field(*field)))
            .context("write CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|error| anyhow!("flush CSV output: {}", error.error()))?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

fn decode_quoted(text: &str) -> Result<Vec<HighlightRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.trim().as_bytes());

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("parse CSV row {}", index + 2))?;
        if row.len() == 1 && row[0].trim().is_empty() {
            continue;
        }
        records.push(record_from_columns(row.iter()));
    }
    Ok(records)
}

fn record_from_columns<I, S>(columns: I) -> HighlightRecord
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut record = HighlightRecord::default();
    let mut columns = columns.into_iter();
    for field in HighlightField::ALL {
        match columns.next() {
            Some(value) => *record.field_mut(field) = value.into(),
            None => break,
        }
    }
    record
}
