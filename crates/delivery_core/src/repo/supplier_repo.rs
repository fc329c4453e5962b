//! Supplier repository.
//!
//! Suppliers are foreign-key targets only: this repository saves and looks
//! them up so delivery locations can reference them.

use crate::model::supplier::Supplier;
use crate::repo::delivery_location_repo::RepoResult;
use crate::repo::{ensure_connection_ready, RequiredTable};
use rusqlite::{params, Connection};

const REQUIRED_TABLES: &[RequiredTable] = &[(
    "suppliers",
    &[
        "user_name",
        "first_name",
        "last_name",
        "password",
        "business_name",
    ],
)];

/// Repository interface for supplier records.
pub trait SupplierRepository {
    /// Inserts the supplier, or overwrites the row with the same `user_name`.
    fn save_supplier(&self, supplier: &Supplier) -> RepoResult<()>;
    fn get_supplier(&self, user_name: &str) -> RepoResult<Option<Supplier>>;
    fn supplier_exists(&self, user_name: &str) -> RepoResult<bool>;
}

/// SQLite-backed supplier repository.
pub struct SqliteSupplierRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSupplierRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl SupplierRepository for SqliteSupplierRepository<'_> {
    fn save_supplier(&self, supplier: &Supplier) -> RepoResult<()> {
        supplier.validate()?;

        // Not REPLACE: that deletes the old row and cascades to delivery_locations.
        self.conn.execute(
            "INSERT INTO suppliers (
                user_name,
                first_name,
                last_name,
                password,
                business_name
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (user_name) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                password = excluded.password,
                business_name = excluded.business_name;",
            params![
                supplier.user_name.as_str(),
                supplier.first_name.as_str(),
                supplier.last_name.as_str(),
                supplier.password.as_str(),
                supplier.business_name.as_str(),
            ],
        )?;

        Ok(())
    }

    fn get_supplier(&self, user_name: &str) -> RepoResult<Option<Supplier>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                user_name,
                first_name,
                last_name,
                password,
                business_name
             FROM suppliers
             WHERE user_name = ?1;",
        )?;

        let mut rows = stmt.query([user_name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(Supplier {
                user_name: row.get("user_name")?,
                first_name: row.get("first_name")?,
                last_name: row.get("last_name")?,
                password: row.get("password")?,
                business_name: row.get("business_name")?,
            }));
        }

        Ok(None)
    }

    fn supplier_exists(&self, user_name: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM suppliers WHERE user_name = ?1);",
            [user_name],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}
