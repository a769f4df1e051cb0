//! Student/laptop persistence (one-to-one, foreign key on the laptop row).

use crate::link::Enforce;
use crate::model::key::{EntityId, Ref, UNASSIGNED_ID};
use crate::model::student::{Laptop, Student};
use crate::repo::store::{parse_key, RepoError, RepoResult, SqliteStore, Store};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

impl Store<Student> for SqliteStore<'_> {
    fn save(&mut self, mut student: Student) -> RepoResult<Student> {
        if student.id != UNASSIGNED_ID {
            return Err(RepoError::AlreadyPersisted {
                entity: "student",
                id: student.id,
            });
        }
        if let Some(laptop) = student.laptop.as_ref() {
            if laptop.lap_id != UNASSIGNED_ID {
                return Err(RepoError::AlreadyPersisted {
                    entity: "laptop",
                    id: laptop.lap_id,
                });
            }
        }
        if !student.is_enforced() {
            return Err(RepoError::Inconsistent(
                "laptop does not point back at its student",
            ));
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO students (uuid, name) VALUES (?1, ?2);",
            params![student.key.to_string(), student.name.as_str()],
        )?;
        student.id = tx.last_insert_rowid();
        // Relink so the laptop's back-reference carries the new id.
        student.enforce();

        if let Some(laptop) = student.laptop.as_mut() {
            tx.execute(
                "INSERT INTO laptops (uuid, name, price, student_id)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    laptop.key.to_string(),
                    laptop.name.as_str(),
                    laptop.price,
                    student.id,
                ],
            )?;
            laptop.lap_id = tx.last_insert_rowid();
        }

        tx.commit()?;
        Ok(student)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Student>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, uuid, name FROM students WHERE id = ?1;",
                [id],
                StudentRow::from_row,
            )
            .optional()?;

        row.map(|row| load_student(self.conn, row)).transpose()
    }

    fn find_all(&self) -> RepoResult<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, uuid, name FROM students ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            let parsed = StudentRow::from_row(row)?;
            students.push(load_student(self.conn, parsed)?);
        }
        Ok(students)
    }
}

struct StudentRow {
    id: EntityId,
    uuid: String,
    name: String,
}

impl StudentRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            uuid: row.get("uuid")?,
            name: row.get("name")?,
        })
    }
}

fn load_student(conn: &Connection, row: StudentRow) -> RepoResult<Student> {
    let key = parse_key(&row.uuid, "students.uuid")?;
    let laptop = conn
        .query_row(
            "SELECT lap_id, uuid, name, price FROM laptops WHERE student_id = ?1;",
            [row.id],
            |laptop_row| {
                Ok((
                    laptop_row.get::<_, EntityId>("lap_id")?,
                    laptop_row.get::<_, String>("uuid")?,
                    laptop_row.get::<_, String>("name")?,
                    laptop_row.get::<_, i64>("price")?,
                ))
            },
        )
        .optional()?;

    let laptop = match laptop {
        Some((lap_id, uuid, name, price)) => Some(Laptop {
            lap_id,
            key: parse_key(&uuid, "laptops.uuid")?,
            name,
            price,
            student: Some(Ref::new(row.id, key)),
        }),
        None => None,
    };

    Ok(Student {
        id: row.id,
        key,
        name: row.name,
        laptop,
    })
}
