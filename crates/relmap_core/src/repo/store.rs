//! Store facade contracts and the shared SQLite implementation.
//!
//! # Responsibility
//! - Define generic save/find contracts for aggregate roots.
//! - Own connection readiness checks and row-decoding helpers.
//!
//! # Invariants
//! - `save` writes a root and all directly linked entities in one
//!   transaction, or nothing.
//! - `save` only accepts transient roots with enforced associations.
//! - Back-references returned by `save` and the read paths carry the
//!   owner's assigned `EntityId`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::key::{EntityId, Key};
use rusqlite::{Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

const REQUIRED_TABLES: &[&str] = &[
    "students",
    "laptops",
    "persons",
    "passports",
    "owners",
    "devices",
    "lib_students",
    "libraries",
    "student_library_mapping",
];

/// Errors from store facade operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Referenced entity does not exist.
    NotFound { entity: &'static str, id: EntityId },
    /// Entity already carries a store identity and cannot be inserted again.
    AlreadyPersisted { entity: &'static str, id: EntityId },
    /// Graph handed to the store does not satisfy bidirectional symmetry.
    Inconsistent(&'static str),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid entity.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::AlreadyPersisted { entity, id } => {
                write!(f, "{entity} already persisted with id {id}")
            }
            Self::Inconsistent(details) => write!(f, "inconsistent entity graph: {details}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "store requires table `{table}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
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

/// Generic persistence contract for one aggregate root type.
pub trait Store<E> {
    /// Persists a transient root and everything it directly links to.
    ///
    /// Returns the root with store identities assigned.
    fn save(&mut self, entity: E) -> RepoResult<E>;
    /// Loads one root with its direct associations.
    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<E>>;
    /// Loads every root, ordered by identity.
    fn find_all(&self) -> RepoResult<Vec<E>>;
}

/// SQLite-backed store for every aggregate root.
pub struct SqliteStore<'conn> {
    pub(crate) conn: &'conn mut Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Wraps a migrated connection, rejecting ones that are not ready.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
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

/// Returns whether a row with `id` exists in `table`.
pub(crate) fn row_exists(conn: &Connection, table: &str, id: EntityId) -> RepoResult<bool> {
    let found = conn
        .query_row(
            &format!("SELECT 1 FROM {table} WHERE id = ?1;"),
            [id],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub(crate) fn parse_key<T>(value: &str, column: &str) -> RepoResult<Key<T>> {
    Uuid::parse_str(value)
        .map(Key::from_uuid)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn parse_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}
