// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use highlights_app::{
    CsvDialect, HighlightFormInput, KeyedRecord, OptionLists, RecordChange, RecordKey,
};
use highlights_db::RecordStore;
use std::path::Path;

pub struct StoreRuntime<'a> {
    records: RecordStore<'a>,
    options: OptionLists,
    dialect: CsvDialect,
}

impl<'a> StoreRuntime<'a> {
    pub fn new(records: RecordStore<'a>, options: OptionLists, dialect: CsvDialect) -> Self {
        Self {
            records,
            options,
            dialect,
        }
    }
}

impl highlights_tui::AppRuntime for StoreRuntime<'_> {
    fn load_records(&mut self) -> Result<Vec<KeyedRecord>> {
        Ok(self.records.entries().to_vec())
    }

    fn option_lists(&mut self) -> OptionLists {
        self.options.clone()
    }

    fn submit_form(
        &mut self,
        selection: Option<RecordKey>,
        form: &HighlightFormInput,
    ) -> Result<RecordChange> {
        let record = form.to_record();
        match selection {
            Some(key) => {
                self.records.replace(key, record)?;
                Ok(RecordChange::Replaced)
            }
            None => {
                self.records.append(record)?;
                Ok(RecordChange::Appended)
            }
        }
    }

    fn delete_record(&mut self, key: RecordKey) -> Result<()> {
        self.records.remove(key)?;
        Ok(())
    }

    fn export_csv(&mut self, path: &Path) -> Result<usize> {
        self.records.export_csv(path, self.dialect)
    }

    fn import_csv(&mut self, path: &Path) -> Result<usize> {
        self.records.import_csv(path, self.dialect)
    }
}

#[cfg(test)]
mod tests {
    use super::StoreRuntime;
    use anyhow::Result;
    use highlights_app::{
        CsvDialect, HighlightField, HighlightFormInput, OptionKind, OptionLists, RecordChange,
    };
    use highlights_db::{RecordStore, Store};
    use highlights_testkit::{HighlightFaker, sample_csv};
    use highlights_tui::AppRuntime;

    fn seeded_store(count: usize) -> Result<Store> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        store.save_highlights(&HighlightFaker::new(11).records(count))?;
        Ok(store)
    }

    fn form_for(user: &str) -> HighlightFormInput {
        let mut form = HighlightFormInput::blank();
        *form.field_mut(HighlightField::User) = user.to_owned();
        form
    }

    #[test]
    fn submit_without_selection_appends_and_persists() -> Result<()> {
        let store = seeded_store(2)?;
        let mut runtime =
            StoreRuntime::new(RecordStore::load(&store)?, OptionLists::default(), CsvDialect::Naive);

        let change = runtime.submit_form(None, &form_for("Dana"))?;
        assert_eq!(change, RecordChange::Appended);

        let persisted = store.load_highlights()?;
        assert_eq!(persisted.len(), 3);
        assert_eq!(persisted[2].user, "Dana");
        assert_eq!(persisted[2].activity, "Saved");
        Ok(())
    }

    #[test]
    fn submit_with_selection_replaces_that_record() -> Result<()> {
        let store = seeded_store(3)?;
        let mut runtime =
            StoreRuntime::new(RecordStore::load(&store)?, OptionLists::default(), CsvDialect::Naive);
        let target = runtime.load_records()?[1].key;

        let change = runtime.submit_form(Some(target), &form_for("Edited"))?;
        assert_eq!(change, RecordChange::Replaced);

        let users: Vec<String> = store
            .load_highlights()?
            .into_iter()
            .map(|record| record.user)
            .collect();
        assert_eq!(users.len(), 3);
        assert_eq!(users[1], "Edited");
        Ok(())
    }

    #[test]
    fn deleted_key_cannot_be_edited() -> Result<()> {
        let store = seeded_store(2)?;
        let mut runtime =
            StoreRuntime::new(RecordStore::load(&store)?, OptionLists::default(), CsvDialect::Naive);
        let target = runtime.load_records()?[0].key;

        runtime.delete_record(target)?;
        let error = runtime
            .submit_form(Some(target), &form_for("Ghost"))
            .expect_err("stale key should fail");
        assert!(error.to_string().contains("no longer exists"));
        assert_eq!(store.load_highlights()?.len(), 1);
        Ok(())
    }

    #[test]
    fn failed_persist_keeps_the_appended_record_visible() -> Result<()> {
        let store = seeded_store(2)?;
        let mut runtime =
            StoreRuntime::new(RecordStore::load(&store)?, OptionLists::default(), CsvDialect::Naive);
        store
            .raw_connection()
            .execute_batch("DROP TABLE local_storage")?;

        assert!(runtime.submit_form(None, &form_for("Dana")).is_err());
        let records = runtime.load_records()?;
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].record.user, "Dana");
        Ok(())
    }

    #[test]
    fn option_lists_are_passed_through() -> Result<()> {
        let store = seeded_store(0)?;
        let mut options = OptionLists::default();
        options.push(OptionKind::Group, "A");
        let mut runtime =
            StoreRuntime::new(RecordStore::load(&store)?, options.clone(), CsvDialect::Naive);
        assert_eq!(runtime.option_lists(), options);
        Ok(())
    }

    #[test]
    fn csv_round_trip_uses_configured_dialect() -> Result<()> {
        let store = seeded_store(0)?;
        let dir = tempfile::tempdir()?;
        let mut runtime =
            StoreRuntime::new(RecordStore::load(&store)?, OptionLists::default(), CsvDialect::Quoted);

        let mut form = form_for("Fay");
        *form.field_mut(HighlightField::Details) = "shipped, finally".to_owned();
        runtime.submit_form(None, &form)?;

        let path = dir.path().join("out.csv");
        assert_eq!(runtime.export_csv(&path)?, 1);
        let text = std::fs::read_to_string(&path)?;
        assert!(text.contains("\"shipped, finally\""));

        let import_path = dir.path().join("in.csv");
        std::fs::write(&import_path, sample_csv())?;
        assert_eq!(runtime.import_csv(&import_path)?, 2);

        runtime.import_csv(&path)?;
        let records = runtime.load_records()?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record.details, "shipped, finally");
        Ok(())
    }
}
