//! Key-value persistence port.
//!
//! JSON documents addressable by string key, with get / set / prefix-scan.
//! Receipts and the per-user receipt index live here, in a store physically
//! separate from the relational database; nothing coordinates writes across
//! the two beyond the best-effort sequencing in the lifecycle manager.

use std::time::Duration;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
) WITHOUT ROWID";

#[derive(Clone)]
pub struct KvStore {
    pool: r2d2::Pool<SqliteConnectionManager>,
}

impl KvStore {
    pub fn open(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            conn.pragma_update(None, "journal_mode", "WAL")?;
            Ok(())
        });
        let pool = r2d2::Pool::builder()
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;
        pool.get()?.execute_batch(SCHEMA)?;
        Ok(Self { pool })
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let conn = self.pool.get()?;
        get_in(&conn, key)
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let conn = self.pool.get()?;
        set_in(&conn, key, value)
    }

    /// Fetch every document whose key starts with `prefix`, in key order.
    /// Insertion order is not preserved; callers needing an ordering sort
    /// on a document field. Keys are internal, so no LIKE escaping.
    pub fn get_by_prefix<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT value FROM kv WHERE key LIKE ?1 || '%' ORDER BY key")?;
        let rows = stmt.query_map(params![prefix], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for raw in rows {
            out.push(serde_json::from_str(&raw?)?);
        }
        Ok(out)
    }

    /// Run `f` inside an IMMEDIATE transaction. The write lock is taken up
    /// front, so a read-check-write sequence inside `f` cannot race another
    /// writer (this backs the receipt transition CAS).
    pub fn transaction<R>(&self, f: impl FnOnce(&Connection) -> Result<R>) -> Result<R> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}

/// Get within an existing connection/transaction.
pub fn get_in<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Option<T>> {
    let raw: Option<String> = conn
        .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
            row.get(0)
        })
        .optional()?;
    match raw {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Set within an existing connection/transaction. Last write wins.
pub fn set_in<T: Serialize>(conn: &Connection, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, raw],
    )?;
    Ok(())
}
