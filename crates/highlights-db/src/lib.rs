// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod record_store;

pub use record_store::RecordStore;

use anyhow::{Context, Result, anyhow, bail};
use highlights_app::HighlightRecord;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const APP_NAME: &str = "highlights";
pub const HIGHLIGHTS_KEY: &str = "highlights";

const DB_FILE_NAME: &str = "highlights.db";

const REQUIRED_SCHEMA: &[(&str, &[&str])] =
    &[("local_storage", &["key", "value", "updated_at"])];

const DEMO_RECORDS: &[[&str; 7]] = &[
    [
        "Alice",
        "Open",
        "Platform",
        "Shipped the new onboarding flow",
        "2024-01-01",
        "Work",
        "Saved",
    ],
    [
        "Bob",
        "In Progress",
        "Support",
        "Closed out the backlog of tier one tickets",
        "2024-01-02",
        "Support",
        "Reviewed",
    ],
    [
        "Carol",
        "Done",
        "Platform",
        "Mentored two new hires through their first release",
        "2024-01-03",
        "Growth",
        "Shared",
    ],
    [
        "alice2",
        "Open",
        "Design",
        "Ran the quarterly usability study",
        "2024-01-01",
        "Research",
        "Saved",
    ],
];

/// SQLite-backed key/value slot store.
///
/// Each key holds one text value, mirroring a browser's local storage.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
        }
        Ok(())
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("read storage key {key}"))
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let now = now_rfc3339()?;
        self.conn
            .execute(
                "
                INSERT INTO local_storage (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET
                  value = excluded.value,
                  updated_at = excluded.updated_at
                ",
                params![key, value, now],
            )
            .with_context(|| format!("write storage key {key}"))?;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM local_storage WHERE key = ?", params![key])
            .with_context(|| format!("remove storage key {key}"))?;
        Ok(removed > 0)
    }

    /// When the value under `key` was last written, if it exists.
    pub fn updated_at(&self, key: &str) -> Result<Option<OffsetDateTime>> {
        let raw = self
            .conn
            .query_row(
                "SELECT updated_at FROM local_storage WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("read timestamp for storage key {key}"))?;
        raw.map(|value| {
            OffsetDateTime::parse(&value, &Rfc3339)
                .with_context(|| format!("parse timestamp {value:?} for storage key {key}"))
        })
        .transpose()
    }

    /// Reads the persisted record list.
    ///
    /// A missing value yields an empty list. So does a value that is not a
    /// JSON record array; the failure is logged and the value is left in
    /// place until the next save overwrites it. A failed read is returned
    /// so callers never treat unreadable data as an empty list.
    pub fn load_highlights(&self) -> Result<Vec<HighlightRecord>> {
        let Some(raw) = self
            .get_item(HIGHLIGHTS_KEY)
            .context("read stored highlights")?
        else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<HighlightRecord>>(&raw) {
            Ok(records) => {
                tracing::debug!(count = records.len(), "loaded highlights");
                Ok(records)
            }
            Err(error) => {
                tracing::warn!(%error, "stored highlights are malformed; starting empty");
                Ok(Vec::new())
            }
        }
    }

    pub fn save_highlights(&self, records: &[HighlightRecord]) -> Result<()> {
        let json = serde_json::to_string(records).context("serialize highlights")?;
        self.set_item(HIGHLIGHTS_KEY, &json)?;
        tracing::debug!(count = records.len(), "saved highlights");
        Ok(())
    }

    /// Seeds sample records when nothing has been stored yet.
    pub fn seed_demo_data(&self) -> Result<usize> {
        if self.get_item(HIGHLIGHTS_KEY)?.is_some() {
            return Ok(0);
        }
        let records = demo_records();
        self.save_highlights(&records)?;
        Ok(records.len())
    }
}

pub fn demo_records() -> Vec<HighlightRecord> {
    DEMO_RECORDS
        .iter()
        .map(
            |[user, status, group, details, date, category, activity]| HighlightRecord {
                user: (*user).to_owned(),
                status: (*status).to_owned(),
                group: (*group).to_owned(),
                details: (*details).to_owned(),
                date: (*date).to_owned(),
                category: (*category).to_owned(),
                activity: (*activity).to_owned(),
            },
        )
        .collect()
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("HIGHLIGHTS_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!(
            "cannot resolve data directory; set HIGHLIGHTS_DB_PATH to a writable database path"
        )
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join(DB_FILE_NAME))
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            bail!(
                "database is missing required table `{table}`; point --config or HIGHLIGHTS_DB_PATH at a highlights database"
            );
        }

        let columns = table_columns(conn, table)?;
        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.contains(*column))
            .collect();

        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}; move the database aside and relaunch",
                missing.join(", ")
            );
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1
              FROM sqlite_master
              WHERE type = 'table' AND name = ?
            )
            ",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("check table existence for {table}"))?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    let names = rows
        .collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))?;
    Ok(names)
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}

#[cfg(test)]
mod tests {
    use super::{HIGHLIGHTS_KEY, Store, demo_records};
    use anyhow::Result;
    use rusqlite::params;

    #[test]
    fn set_item_overwrites_and_stamps_updated_at() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;

        assert_eq!(store.get_item("k")?, None);
        assert_eq!(store.updated_at("k")?, None);

        store.set_item("k", "one")?;
        store.set_item("k", "two")?;
        assert_eq!(store.get_item("k")?.as_deref(), Some("two"));
        assert!(store.updated_at("k")?.is_some());

        assert!(store.remove_item("k")?);
        assert!(!store.remove_item("k")?);
        Ok(())
    }

    #[test]
    fn seed_demo_data_only_fills_an_empty_slot() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;

        assert_eq!(store.seed_demo_data()?, demo_records().len());
        assert_eq!(store.load_highlights()?, demo_records());

        store.save_highlights(&[])?;
        assert_eq!(store.seed_demo_data()?, 0);
        assert!(store.load_highlights()?.is_empty());
        Ok(())
    }

    #[test]
    fn non_array_json_loads_as_empty() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;

        store.set_item(HIGHLIGHTS_KEY, r#"{"user":"Alice"}"#)?;
        assert!(store.load_highlights()?.is_empty());
        Ok(())
    }

    #[test]
    fn unreadable_slot_is_an_error_and_keeps_the_value() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        store.save_highlights(&demo_records())?;
        store.raw_connection().execute(
            "UPDATE local_storage SET value = CAST(x'FF' AS BLOB) WHERE key = ?",
            params![HIGHLIGHTS_KEY],
        )?;

        let error = store
            .load_highlights()
            .expect_err("unreadable value should fail");
        assert!(format!("{error:#}").contains("read stored highlights"));

        let kept: Vec<u8> = store.raw_connection().query_row(
            "SELECT value FROM local_storage WHERE key = ?",
            params![HIGHLIGHTS_KEY],
            |row| row.get(0),
        )?;
        assert_eq!(kept, vec![0xFF]);
        Ok(())
    }
}
