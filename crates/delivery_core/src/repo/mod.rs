//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the persistence collaborator consumed by the service layer.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Repositories are only built over connections whose schema is current.
//! - Absent identities surface as `RepoError::NotFound`, never as `Ok`.

use crate::db::migrations::{current_user_version, latest_version};
use rusqlite::Connection;

pub mod delivery_location_repo;
pub mod supplier_repo;

use delivery_location_repo::{RepoError, RepoResult};

/// Table name plus the columns a repository reads or writes.
pub(crate) type RequiredTable = (&'static str, &'static [&'static str]);

/// Rejects connections that were not bootstrapped through `db::open_db*`.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    tables: &[RequiredTable],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
