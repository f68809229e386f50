//! Durable record of every item URL the digest has processed.
//!
//! The table is insert-only: a URL's date is fixed the first time it is seen
//! and its summary is never re-fetched, so there is no update or delete.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS seen (
    url     TEXT PRIMARY KEY,
    date    TEXT,
    summary TEXT
)";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another insert for the same URL won. Only reachable when two runs
    /// share a database.
    #[error("url already recorded: {0}")]
    Duplicate(String),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("could not create database directory: {0}")]
    Io(#[from] std::io::Error),
}

/// One row of the `seen` table.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SeenRecord {
    pub url: String,
    pub last_seen_date: NaiveDate,
    /// Cached summary. An empty stored string reads back as `None`.
    pub summary: Option<String>,
}

pub struct SeenStore {
    conn: Connection,
}

impl SeenStore {
    /// Open (or create) the store at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn lookup(&self, url: &str) -> Result<Option<SeenRecord>, StoreError> {
        let record = self
            .conn
            .query_row(
                "SELECT url, date, summary FROM seen WHERE url = ?1",
                params![url],
                |row| {
                    let summary: Option<String> = row.get(2)?;
                    Ok(SeenRecord {
                        url: row.get(0)?,
                        last_seen_date: row.get(1)?,
                        summary: summary.filter(|s| !s.is_empty()),
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Record `url` as first seen on `date`.
    ///
    /// Fails with [`StoreError::Duplicate`] if the URL is already present;
    /// callers only insert after a lookup came back empty.  The row is
    /// committed before this returns (autocommit).
    pub fn insert(&self, url: &str, date: NaiveDate, summary: &str) -> Result<(), StoreError> {
        let result = self.conn.execute(
            "INSERT INTO seen (url, date, summary) VALUES (?1, ?2, ?3)",
            params![url, date, summary],
        );
        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StoreError::Duplicate(url.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Number of recorded URLs.
    pub fn len(&self) -> Result<usize, StoreError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM seen", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn lookup_of_unknown_url_is_none() {
        let store = SeenStore::open_in_memory().unwrap();
        assert_eq!(store.lookup("https://example.com/a").unwrap(), None);
    }

    #[test]
    fn insert_then_lookup_returns_record() {
        let store = SeenStore::open_in_memory().unwrap();
        store.insert("https://example.com/a", day(1), "short summary").unwrap();

        let record = store.lookup("https://example.com/a").unwrap().unwrap();
        assert_eq!(record.url, "https://example.com/a");
        assert_eq!(record.last_seen_date, day(1));
        assert_eq!(record.summary.as_deref(), Some("short summary"));
    }

    #[test]
    fn empty_summary_reads_back_as_none() {
        let store = SeenStore::open_in_memory().unwrap();
        store.insert("https://example.com/a", day(1), "").unwrap();
        assert_eq!(store.lookup("https://example.com/a").unwrap().unwrap().summary, None);
    }

    #[test]
    fn duplicate_insert_is_rejected_and_record_is_unchanged() {
        let store = SeenStore::open_in_memory().unwrap();
        store.insert("https://example.com/a", day(1), "first").unwrap();

        let err = store.insert("https://example.com/a", day(2), "second").unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(ref url) if url == "https://example.com/a"));

        let record = store.lookup("https://example.com/a").unwrap().unwrap();
        assert_eq!(record.last_seen_date, day(1));
        assert_eq!(record.summary.as_deref(), Some("first"));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn lookup_is_exact_match() {
        let store = SeenStore::open_in_memory().unwrap();
        store.insert("https://example.com/a", day(1), "").unwrap();
        assert!(store.lookup("https://example.com/a/").unwrap().is_none());
        assert!(store.lookup("https://EXAMPLE.com/a").unwrap().is_none());
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("seen.db");

        {
            let store = SeenStore::open(&path).unwrap();
            store.insert("https://example.com/a", day(3), "kept").unwrap();
        }

        let store = SeenStore::open(&path).unwrap();
        let record = store.lookup("https://example.com/a").unwrap().unwrap();
        assert_eq!(record.last_seen_date, day(3));
        assert_eq!(record.summary.as_deref(), Some("kept"));
    }

    #[test]
    fn second_connection_sees_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.db");
        let first = SeenStore::open(&path).unwrap();
        let second = SeenStore::open(&path).unwrap();

        first.insert("https://example.com/a", day(1), "").unwrap();
        assert!(matches!(
            second.insert("https://example.com/a", day(1), ""),
            Err(StoreError::Duplicate(_))
        ));
    }
}
