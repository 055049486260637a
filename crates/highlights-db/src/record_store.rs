// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use highlights_app::{CsvDialect, HighlightRecord, KeyedRecord, RecordKey, RecordList, csv};
use std::fs;
use std::path::Path;

use crate::Store;

/// The record list backed by the `highlights` storage slot.
///
/// Every mutation updates the in-memory list first and then writes the whole
/// list back. A failed write is returned to the caller and the in-memory
/// change is kept.
pub struct RecordStore<'a> {
    store: &'a Store,
    list: RecordList,
}

impl<'a> RecordStore<'a> {
    pub fn load(store: &'a Store) -> Result<Self> {
        let list = RecordList::from_records(store.load_highlights()?);
        Ok(Self { store, list })
    }

    pub fn entries(&self) -> &[KeyedRecord] {
        self.list.entries()
    }

    pub fn records(&self) -> Vec<HighlightRecord> {
        self.list.records()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, key: RecordKey) -> Option<&HighlightRecord> {
        self.list.get(key)
    }

    pub fn save(&self) -> Result<()> {
        self.store.save_highlights(&self.list.records())
    }

    pub fn append(&mut self, record: HighlightRecord) -> Result<RecordKey> {
        let key = self.list.append(record);
        self.save()?;
        Ok(key)
    }

    pub fn replace(&mut self, key: RecordKey, record: HighlightRecord) -> Result<()> {
        self.list.replace(key, record)?;
        self.save()
    }

    pub fn replace_at(&mut self, index: usize, record: HighlightRecord) -> Result<RecordKey> {
        let key = self.list.replace_at(index, record)?;
        self.save()?;
        Ok(key)
    }

    pub fn remove(&mut self, key: RecordKey) -> Result<HighlightRecord> {
        let removed = self.list.remove(key)?;
        self.save()?;
        Ok(removed)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<HighlightRecord> {
        let removed = self.list.remove_at(index)?;
        self.save()?;
        Ok(removed)
    }

    pub fn replace_all(&mut self, records: Vec<HighlightRecord>) -> Result<()> {
        self.list.replace_all(records);
        self.save()
    }

    /// Writes the whole list as CSV to `path`, returning the record count.
    pub fn export_csv(&self, path: &Path, dialect: CsvDialect) -> Result<usize> {
        let records = self.list.records();
        let text = csv::encode_with(&records, dialect).context("encode CSV export")?;
        fs::write(path, text).with_context(|| {
            format!(
                "write CSV export to {} -- check the directory exists and is writable",
                path.display()
            )
        })?;
        tracing::info!(
            path = %path.display(),
            count = records.len(),
            dialect = dialect.as_str(),
            "exported highlights"
        );
        Ok(records.len())
    }

    /// Replaces the whole list with the records parsed from the CSV at
    /// `path`, returning the new record count.
    ///
    /// An unreadable or unparseable file leaves the list untouched.
    pub fn import_csv(&mut self, path: &Path, dialect: CsvDialect) -> Result<usize> {
        let text = fs::read_to_string(path).with_context(|| {
            format!(
                "read CSV import from {} -- check the path and retry",
                path.display()
            )
        })?;
        let records = csv::decode_with(&text, dialect)
            .with_context(|| format!("parse CSV import from {}", path.display()))?;
        let count = records.len();
        self.replace_all(records)?;
        tracing::info!(
            path = %path.display(),
            count,
            dialect = dialect.as_str(),
            "imported highlights"
        );
        Ok(count)
    }
}
