//! Library-student/library persistence (many-to-many via join table).
//!
//! # Invariants
//! - Each association is one `student_library_mapping` row. A library listed
//!   more than once (same id or same key) is linked once, and the returned
//!   collection lists it once.
//! - Libraries with an identity are referenced, never re-inserted.
//! - Returned libraries carry the full stored reverse set.

use crate::link::Enforce;
use crate::model::key::{EntityId, Key, UNASSIGNED_ID};
use crate::model::library::{LibStudent, Library};
use crate::repo::store::{
    bool_to_int, parse_bool, parse_key, RepoError, RepoResult, SqliteStore, Store,
};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::BTreeSet;

/// Library-student store with lookup from the reverse side.
pub trait LibraryStore: Store<LibStudent> {
    /// Loads one library together with every student linked to it.
    fn find_library(&self, id: EntityId) -> RepoResult<Option<Library>>;
}

impl Store<LibStudent> for SqliteStore<'_> {
    fn save(&mut self, mut student: LibStudent) -> RepoResult<LibStudent> {
        if student.id != UNASSIGNED_ID {
            return Err(RepoError::AlreadyPersisted {
                entity: "lib_student",
                id: student.id,
            });
        }
        if !student.is_enforced() {
            return Err(RepoError::Inconsistent(
                "library does not list its student on the reverse side",
            ));
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO lib_students (uuid, name) VALUES (?1, ?2);",
            params![student.key.to_string(), student.name.as_str()],
        )?;
        student.id = tx.last_insert_rowid();

        if let Some(requested) = student.libraries.take() {
            let mut seen = BTreeSet::new();
            let mut libraries = Vec::with_capacity(requested.len());
            for mut library in requested {
                if library.id != UNASSIGNED_ID {
                    // Existing rows are referenced; their stored fields win.
                    library = load_library(&tx, library.id)?.ok_or(RepoError::NotFound {
                        entity: "library",
                        id: library.id,
                    })?;
                }
                if !seen.insert(library.key) {
                    continue;
                }
                if library.id == UNASSIGNED_ID {
                    library.id = insert_library(&tx, &library)?;
                }

                tx.execute(
                    "INSERT INTO student_library_mapping (student_id, library_id, position)
                     VALUES (?1, ?2, ?3);",
                    params![student.id, library.id, libraries.len() as i64],
                )?;
                libraries.push(library);
            }

            for library in &mut libraries {
                library.students = load_reverse_set(&tx, library.id)?;
            }
            student.libraries = Some(libraries);
        }

        tx.commit()?;
        Ok(student)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<LibStudent>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, uuid, name FROM lib_students WHERE id = ?1;",
                [id],
                LibStudentRow::from_row,
            )
            .optional()?;

        row.map(|row| load_lib_student(self.conn, row)).transpose()
    }

    fn find_all(&self) -> RepoResult<Vec<LibStudent>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, uuid, name FROM lib_students ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            let parsed = LibStudentRow::from_row(row)?;
            students.push(load_lib_student(self.conn, parsed)?);
        }
        Ok(students)
    }
}

impl LibraryStore for SqliteStore<'_> {
    fn find_library(&self, id: EntityId) -> RepoResult<Option<Library>> {
        load_library(self.conn, id)
    }
}

fn insert_library(conn: &Connection, library: &Library) -> RepoResult<EntityId> {
    let key = library.key.to_string();
    let existing = conn
        .query_row(
            "SELECT id FROM libraries WHERE uuid = ?1;",
            [key.as_str()],
            |row| row.get::<_, EntityId>(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Err(RepoError::AlreadyPersisted {
            entity: "library",
            id,
        });
    }

    conn.execute(
        "INSERT INTO libraries (uuid, book, valid) VALUES (?1, ?2, ?3);",
        params![key, library.book.as_str(), bool_to_int(library.valid)],
    )?;
    Ok(conn.last_insert_rowid())
}

struct LibStudentRow {
    id: EntityId,
    uuid: String,
    name: String,
}

impl LibStudentRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            uuid: row.get("uuid")?,
            name: row.get("name")?,
        })
    }
}

fn load_lib_student(conn: &Connection, row: LibStudentRow) -> RepoResult<LibStudent> {
    let mut stmt = conn.prepare(
        "SELECT l.id, l.uuid, l.book, l.valid
         FROM student_library_mapping m
         INNER JOIN libraries l ON l.id = m.library_id
         WHERE m.student_id = ?1
         ORDER BY m.position ASC, l.id ASC;",
    )?;
    let mut rows = stmt.query([row.id])?;
    let mut libraries = Vec::new();
    while let Some(library_row) = rows.next()? {
        let mut library = parse_library_row(library_row)?;
        library.students = load_reverse_set(conn, library.id)?;
        libraries.push(library);
    }

    Ok(LibStudent {
        id: row.id,
        key: parse_key(&row.uuid, "lib_students.uuid")?,
        name: row.name,
        libraries: Some(libraries),
    })
}

fn load_library(conn: &Connection, id: EntityId) -> RepoResult<Option<Library>> {
    let mut stmt = conn.prepare("SELECT id, uuid, book, valid FROM libraries WHERE id = ?1;")?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        let mut library = parse_library_row(row)?;
        library.students = load_reverse_set(conn, library.id)?;
        return Ok(Some(library));
    }

    Ok(None)
}

fn parse_library_row(row: &Row<'_>) -> RepoResult<Library> {
    let uuid: String = row.get("uuid")?;
    Ok(Library {
        id: row.get("id")?,
        key: parse_key(&uuid, "libraries.uuid")?,
        book: row.get("book")?,
        valid: parse_bool(row.get("valid")?, "libraries.valid")?,
        students: BTreeSet::new(),
    })
}

fn load_reverse_set(
    conn: &Connection,
    library_id: EntityId,
) -> RepoResult<BTreeSet<Key<LibStudent>>> {
    let mut stmt = conn.prepare(
        "SELECT s.uuid
         FROM student_library_mapping m
         INNER JOIN lib_students s ON s.id = m.student_id
         WHERE m.library_id = ?1;",
    )?;
    let mut rows = stmt.query([library_id])?;
    let mut students = BTreeSet::new();
    while let Some(row) = rows.next()? {
        let uuid: String = row.get(0)?;
        students.insert(parse_key(&uuid, "lib_students.uuid")?);
    }
    Ok(students)
}
