//! Column lists and row-mapping helpers shared by the query layer.
//!
//! Each `*_COLS` constant must stay in column-index sync with the matching
//! `FromRow` impl below.

use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::{Connection, Params, Row};

use crate::error::Result;
use crate::models::*;

pub const SUBSCRIPTION_COLS: &str =
    "id, activation_code, plan, status, expires_at, created_at, user_email";

pub const ADMIN_COLS: &str =
    "id, email, password_hash, name, role, is_active, created_at, last_login_at";

pub const ADMIN_SESSION_COLS: &str = "id, admin_id, token_hash, created_at";

pub const USER_COLS: &str = "id, email, name, token_hash, subscription_plan, \
     subscription_status, activation_code, created_at";

pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

fn parse_text<T: FromStr>(idx: usize, raw: String) -> rusqlite::Result<T> {
    raw.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unrecognized value: {raw}").into(),
        )
    })
}

impl FromRow for Subscription {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            activation_code: row.get(1)?,
            plan: row.get(2)?,
            status: parse_text(3, row.get::<_, String>(3)?)?,
            expires_at: row.get(4)?,
            created_at: row.get(5)?,
            user_email: row.get(6)?,
        })
    }
}

impl FromRow for Admin {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            email: row.get(1)?,
            password_hash: row.get(2)?,
            name: row.get(3)?,
            role: parse_text(4, row.get::<_, String>(4)?)?,
            is_active: row.get(5)?,
            created_at: row.get(6)?,
            last_login_at: row.get(7)?,
        })
    }
}

impl FromRow for AdminSession {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            admin_id: row.get(1)?,
            token_hash: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl FromRow for User {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let status: Option<String> = row.get(5)?;
        Ok(Self {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            token_hash: row.get(3)?,
            subscription_plan: row.get(4)?,
            subscription_status: status.map(|s| parse_text(5, s)).transpose()?,
            activation_code: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

pub fn query_one<T: FromRow, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query_map(params, T::from_row)?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn query_all<T: FromRow, P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, T::from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
