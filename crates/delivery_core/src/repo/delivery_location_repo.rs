//! Delivery location repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/get/update/delete/filter over `delivery_locations`.
//! - Map SQLite failures and absent rows to semantic `RepoError`s.
//!
//! # Invariants
//! - Inserts run `DeliveryLocation::validate()` before any SQL mutation.
//! - Updates write fields as given; they do not re-validate, so reads accept
//!   an empty place name.
//! - Every write checks that the owning supplier exists.
//! - Listing order is ascending `id`, i.e. insertion order.

use crate::db::DbError;
use crate::model::delivery_location::{
    DeliveryLocation, DeliveryLocationId, DeliveryLocationValidationError,
};
use crate::model::supplier::SupplierValidationError;
use crate::repo::{ensure_connection_ready, RequiredTable};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DELIVERY_LOCATION_SELECT_SQL: &str = "SELECT
    id,
    supplier_user_name,
    location,
    date
FROM delivery_locations";

const REQUIRED_TABLES: &[RequiredTable] = &[
    ("suppliers", &["user_name"]),
    (
        "delivery_locations",
        &["id", "supplier_user_name", "location", "date"],
    ),
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for supplier and delivery location persistence.
#[derive(Debug)]
pub enum RepoError {
    /// The record failed validation; nothing was written.
    Validation(DeliveryLocationValidationError),
    SupplierValidation(SupplierValidationError),
    Db(DbError),
    /// No row for this id. `None` means the record was never persisted.
    NotFound(Option<DeliveryLocationId>),
    /// The referenced supplier has not been saved.
    UnknownSupplier(String),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Returns whether this is the "does not exist" failure kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns whether this is a field validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::SupplierValidation(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::SupplierValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(Some(id)) => write!(f, "delivery location not found: {id}"),
            Self::NotFound(None) => write!(f, "delivery location has not been persisted"),
            Self::UnknownSupplier(user_name) => write!(f, "supplier not found: {user_name}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted delivery location data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::SupplierValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DeliveryLocationValidationError> for RepoError {
    fn from(value: DeliveryLocationValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SupplierValidationError> for RepoError {
    fn from(value: SupplierValidationError) -> Self {
        Self::SupplierValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Typed filter for listing delivery locations.
///
/// Every populated field narrows the result; the default query lists all rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryLocationQuery {
    /// Exact supplier `user_name`.
    pub owner: Option<String>,
    /// Exact, case-sensitive place name.
    pub location: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl DeliveryLocationQuery {
    pub fn owned_by(user_name: impl Into<String>) -> Self {
        Self {
            owner: Some(user_name.into()),
            ..Self::default()
        }
    }

    pub fn at_location(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::default()
        }
    }
}

/// Persistence collaborator for delivery locations.
pub trait DeliveryLocationRepository {
    /// Inserts an unsaved record and returns the id assigned by the store.
    fn insert_delivery_location(&self, record: &DeliveryLocation)
        -> RepoResult<DeliveryLocationId>;
    /// Writes `owner`, `location` and `date` of an already persisted record.
    ///
    /// Fails with `UnknownSupplier` when `owner` names no saved supplier.
    fn update_delivery_location(&self, record: &DeliveryLocation) -> RepoResult<()>;
    fn delete_delivery_location(&self, id: DeliveryLocationId) -> RepoResult<()>;
    fn get_delivery_location(&self, id: DeliveryLocationId)
        -> RepoResult<Option<DeliveryLocation>>;
    fn list_delivery_locations(
        &self,
        query: &DeliveryLocationQuery,
    ) -> RepoResult<Vec<DeliveryLocation>>;
}

/// SQLite-backed delivery location repository.
pub struct SqliteDeliveryLocationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDeliveryLocationRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
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

impl DeliveryLocationRepository for SqliteDeliveryLocationRepository<'_> {
    fn insert_delivery_location(
        &self,
        record: &DeliveryLocation,
    ) -> RepoResult<DeliveryLocationId> {
        record.validate()?;

        if !self.supplier_exists(&record.owner)? {
            return Err(RepoError::UnknownSupplier(record.owner.clone()));
        }

        self.conn.execute(
            "INSERT INTO delivery_locations (
                supplier_user_name,
                location,
                date
            ) VALUES (?1, ?2, ?3);",
            params![record.owner.as_str(), record.location.as_str(), record.date],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_delivery_location(&self, record: &DeliveryLocation) -> RepoResult<()> {
        let id = record.id().ok_or(RepoError::NotFound(None))?;

        if !self.supplier_exists(&record.owner)? {
            return Err(RepoError::UnknownSupplier(record.owner.clone()));
        }

        let changed = self.conn.execute(
            "UPDATE delivery_locations
             SET
                supplier_user_name = ?1,
                location = ?2,
                date = ?3
             WHERE id = ?4;",
            params![
                record.owner.as_str(),
                record.location.as_str(),
                record.date,
                id
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(Some(id)));
        }

        Ok(())
    }

    fn delete_delivery_location(&self, id: DeliveryLocationId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM delivery_locations WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(Some(id)));
        }

        Ok(())
    }

    fn get_delivery_location(
        &self,
        id: DeliveryLocationId,
    ) -> RepoResult<Option<DeliveryLocation>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DELIVERY_LOCATION_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_delivery_location_row(row)?));
        }

        Ok(None)
    }

    fn list_delivery_locations(
        &self,
        query: &DeliveryLocationQuery,
    ) -> RepoResult<Vec<DeliveryLocation>> {
        let mut sql = format!("{DELIVERY_LOCATION_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(owner) = query.owner.as_ref() {
            sql.push_str(" AND supplier_user_name = ?");
            bind_values.push(Value::Text(owner.clone()));
        }

        if let Some(location) = query.location.as_ref() {
            sql.push_str(" AND location = ?");
            bind_values.push(Value::Text(location.clone()));
        }

        sql.push_str(" ORDER BY id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_delivery_location_row(row)?);
        }

        Ok(records)
    }
}

fn parse_delivery_location_row(row: &Row<'_>) -> RepoResult<DeliveryLocation> {
    let id: DeliveryLocationId = row.get("id")?;
    let date_text: String = row.get("date")?;
    let date = date_text.parse().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid date `{date_text}` in delivery_locations.date for id {id}"
        ))
    })?;

    Ok(DeliveryLocation::from_row(
        id,
        row.get("supplier_user_name")?,
        row.get("location")?,
        date,
    ))
}
