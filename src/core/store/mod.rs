//! Read-only SQLite transaction store
//!
//! The store is populated by an external import process; this module never
//! writes to it. A [`TransactionStore`] owns one read-only connection. It is
//! opened explicitly by the caller and closed when dropped (or through
//! [`TransactionStore::close`]). Parallel readers each open their own handle.

mod queries;
pub mod schema;
mod stats;
mod types;

pub use types::*;

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

/// Errors raised by the transaction store
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    /// The store could not be opened; distinct from an empty result
    #[error("transaction store unavailable at {}: {reason}", path.display())]
    #[diagnostic(
        code(dxb::store::unavailable),
        help("set DLD_DATABASE_PATH or pass --db <PATH>; --sample serves synthetic data instead")
    )]
    Unavailable { path: PathBuf, reason: String },

    #[error("query failed: {0}")]
    #[diagnostic(code(dxb::store::query))]
    Query(#[from] rusqlite::Error),

    #[error("transaction {transaction_id} has an unreadable date '{value}'")]
    #[diagnostic(
        code(dxb::store::date),
        help("instance_date must be YYYY-MM-DD or DD-MM-YYYY")
    )]
    InvalidDate {
        transaction_id: String,
        value: String,
    },

    #[error("invalid filter: {0}")]
    #[diagnostic(code(dxb::store::filter))]
    InvalidFilter(String),
}

/// The transaction store backed by SQLite
pub struct TransactionStore {
    conn: Connection,
    path: PathBuf,
    iso_dates: bool,
}

impl TransactionStore {
    /// Open an existing store read-only
    ///
    /// Fails with [`StoreError::Unavailable`] when the file is missing, is not
    /// a database, or has no `transactions` table.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let unavailable = |reason: String| StoreError::Unavailable {
            path: path.clone(),
            reason,
        };

        if !path.is_file() {
            return Err(unavailable("file not found".to_string()));
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| unavailable(e.to_string()))?;

        let store = Self::from_connection(conn, &path).map_err(|e| unavailable(e.to_string()))?;
        log::debug!("opened transaction store {}", path.display());
        Ok(store)
    }

    /// Wrap an already-populated connection (in-memory fixtures, synthetic data)
    pub fn from_connection(conn: Connection, label: impl AsRef<Path>) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA query_only = ON;")?;
        // Probe so a missing table surfaces now rather than on the first query
        conn.prepare("SELECT 1 FROM transactions LIMIT 1")?;
        let iso_dates: bool = conn.query_row(queries::ISO_DATES_PROBE, [], |row| row.get(0))?;
        if !iso_dates {
            log::debug!("store has DD-MM-YYYY dates; date filters will not use the index");
        }
        Ok(Self {
            conn,
            path: label.as_ref().to_path_buf(),
            iso_dates,
        })
    }

    /// Location the store was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total number of stored rows, unfiltered
    pub fn row_count(&self) -> Result<i64, StoreError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Close the underlying connection
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::Query(e))
    }
}

/// Escape user text for a `LIKE ... ESCAPE '\'` substring pattern
pub(crate) fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
