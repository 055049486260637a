// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::{HighlightRecord, KeyedRecord, RecordKey};

/// Ordered in-memory record list with session-local keys.
///
/// Every key is unique for the lifetime of the list, including across
/// `replace_all`, so a stale selection can never address a different record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordList {
    entries: Vec<KeyedRecord>,
    next_key: i64,
}

impl Default for RecordList {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_key: 1,
        }
    }
}

impl RecordList {
    pub fn from_records(records: Vec<HighlightRecord>) -> Self {
        let mut list = Self::default();
        list.replace_all(records);
        list
    }

    pub fn entries(&self) -> &[KeyedRecord] {
        &self.entries
    }

    pub fn records(&self) -> Vec<HighlightRecord> {
        self.entries
            .iter()
            .map(|entry| entry.record.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: RecordKey) -> Option<&HighlightRecord> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.record)
    }

    pub fn position(&self, key: RecordKey) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    pub fn key_at(&self, index: usize) -> Option<RecordKey> {
        self.entries.get(index).map(|entry| entry.key)
    }

    pub fn append(&mut self, record: HighlightRecord) -> RecordKey {
        let key = self.allocate_key();
        self.entries.push(KeyedRecord { key, record });
        key
    }

    pub fn replace(&mut self, key: RecordKey, record: HighlightRecord) -> Result<()> {
        let Some(index) = self.position(key) else {
            bail!(
                "record {} no longer exists -- select the entry again and retry",
                key.get()
            );
        };
        self.entries[index].record = record;
        Ok(())
    }

    pub fn replace_at(&mut self, index: usize, record: HighlightRecord) -> Result<RecordKey> {
        let len = self.entries.len();
        let Some(entry) = self.entries.get_mut(index) else {
            bail!("record index {index} is out of range for {len} records");
        };
        entry.record = record;
        Ok(entry.key)
    }

    pub fn remove(&mut self, key: RecordKey) -> Result<HighlightRecord> {
        let Some(index) = self.position(key) else {
            bail!(
                "record {} no longer exists -- refresh the list and retry",
                key.get()
            );
        };
        Ok(self.entries.remove(index).record)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<HighlightRecord> {
        if index >= self.entries.len() {
            bail!(
                "record index {index} is out of range for {} records",
                self.entries.len()
            );
        }
        Ok(self.entries.remove(index).record)
    }

    pub fn replace_all(&mut self, records: Vec<HighlightRecord>) {
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let key = self.allocate_key();
            entries.push(KeyedRecord { key, record });
        }
        self.entries = entries;
    }

    fn allocate_key(&mut self) -> RecordKey {
        let key = RecordKey::new(self.next_key);
        self.next_key += 1;
        key
    }
}

#[cfg(test)]
mod tests {
    use super::RecordList;
    use crate::{HighlightRecord, RecordKey};
    use anyhow::Result;

    fn record(user: &str) -> HighlightRecord {
        HighlightRecord {
            user: user.to_owned(),
            ..HighlightRecord::default()
        }
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut list = RecordList::default();
        list.append(record("a"));
        list.append(record("b"));
        list.append(record("c"));

        let users = list
            .records()
            .into_iter()
            .map(|record| record.user)
            .collect::<Vec<_>>();
        assert_eq!(users, ["a", "b", "c"]);
    }

    #[test]
    fn append_then_remove_at_same_index_restores_list() -> Result<()> {
        let mut list = RecordList::from_records(vec![record("a"), record("b")]);
        let before = list.records();

        list.append(record("c"));
        let removed = list.remove_at(2)?;

        assert_eq!(removed.user, "c");
        assert_eq!(list.records(), before);
        Ok(())
    }

    #[test]
    fn keys_follow_records_when_earlier_rows_are_removed() -> Result<()> {
        let mut list = RecordList::from_records(vec![record("a"), record("b"), record("c")]);
        let selected = list.key_at(2).expect("third record has a key");

        list.remove_at(0)?;
        list.replace(selected, record("c-edited"))?;

        let users = list
            .records()
            .into_iter()
            .map(|record| record.user)
            .collect::<Vec<_>>();
        assert_eq!(users, ["b", "c-edited"]);
        Ok(())
    }

    #[test]
    fn replace_with_removed_key_fails_without_editing() -> Result<()> {
        let mut list = RecordList::from_records(vec![record("a"), record("b")]);
        let key = list.key_at(0).expect("first record has a key");
        list.remove(key)?;

        let error = list
            .replace(key, record("ghost"))
            .expect_err("stale key should be rejected");
        assert!(error.to_string().contains("no longer exists"));
        assert_eq!(list.records(), vec![record("b")]);
        Ok(())
    }

    #[test]
    fn replace_all_issues_fresh_keys() {
        let mut list = RecordList::from_records(vec![record("a")]);
        let old_key = list.key_at(0).expect("key");

        list.replace_all(vec![record("x"), record("y")]);
        assert_eq!(list.len(), 2);
        assert!(list.get(old_key).is_none());
        assert!(list.entries().iter().all(|entry| entry.key != old_key));
    }

    #[test]
    fn out_of_range_index_operations_fail() {
        let mut list = RecordList::default();
        assert!(list.remove_at(0).is_err());
        assert!(list.replace_at(3, record("x")).is_err());
        assert!(list.get(RecordKey::new(99)).is_none());
    }

    #[test]
    fn replace_at_keeps_the_key() -> Result<()> {
        let mut list = RecordList::from_records(vec![record("a"), record("b")]);
        let key = list.key_at(1).expect("key");
        let returned = list.replace_at(1, record("B"))?;
        assert_eq!(returned, key);
        assert_eq!(list.get(key).map(|record| record.user.as_str()), Some("B"));
        Ok(())
    }
}
