//! Relational persistence port: subscriptions, admins, sessions, users.

mod from_row;
pub mod queries;

use std::time::Duration;

use r2d2_sqlite::SqliteConnectionManager;

use crate::config::Config;
use crate::error::Result;
use crate::kv::KvStore;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub kv: KvStore,
    pub dev_mode: bool,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            db: open_pool(&config.database_path)?,
            kv: KvStore::open(&config.kv_database_path)?,
            dev_mode: config.dev_mode,
        })
    }
}

pub fn open_pool(path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(path).with_init(|conn| {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    });
    let pool = r2d2::Pool::builder()
        .connection_timeout(Duration::from_secs(5))
        .build(manager)?;
    pool.get()?.execute_batch(SCHEMA)?;
    Ok(pool)
}

// activation_code is the primary key: write-time uniqueness backs the
// registry's mint-and-retry loop.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS subscriptions (
    id TEXT NOT NULL,
    activation_code TEXT PRIMARY KEY,
    plan TEXT NOT NULL,
    status TEXT NOT NULL,
    expires_at INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    user_email TEXT
);
CREATE INDEX IF NOT EXISTS idx_subscriptions_created_at ON subscriptions (created_at);

CREATE TABLE IF NOT EXISTS admins (
    id TEXT PRIMARY KEY,
    email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    name TEXT NOT NULL,
    role TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at INTEGER NOT NULL,
    last_login_at INTEGER
);

CREATE TABLE IF NOT EXISTS admin_sessions (
    id TEXT PRIMARY KEY,
    admin_id TEXT NOT NULL REFERENCES admins (id),
    token_hash TEXT UNIQUE NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT UNIQUE NOT NULL,
    name TEXT NOT NULL,
    token_hash TEXT UNIQUE,
    subscription_plan TEXT,
    subscription_status TEXT,
    activation_code TEXT,
    created_at INTEGER NOT NULL
);
";
