//! Person/passport persistence (one-to-one, foreign key on the person row).

use crate::link::Enforce;
use crate::model::key::{EntityId, Key, Ref, UNASSIGNED_ID};
use crate::model::person::{Passport, Person};
use crate::repo::store::{
    bool_to_int, parse_bool, parse_key, RepoError, RepoResult, SqliteStore, Store,
};
use rusqlite::{params, Row, TransactionBehavior};

const PERSON_SELECT_SQL: &str = "SELECT
    p.id,
    p.uuid,
    p.name,
    pp.id AS passport_id,
    pp.uuid AS passport_uuid,
    pp.name AS passport_name,
    pp.valid AS passport_valid
FROM persons p
LEFT JOIN passports pp ON pp.id = p.passport_id";

impl Store<Person> for SqliteStore<'_> {
    fn save(&mut self, mut person: Person) -> RepoResult<Person> {
        if person.id != UNASSIGNED_ID {
            return Err(RepoError::AlreadyPersisted {
                entity: "person",
                id: person.id,
            });
        }
        if let Some(passport) = person.passport.as_ref() {
            if passport.id != UNASSIGNED_ID {
                return Err(RepoError::AlreadyPersisted {
                    entity: "passport",
                    id: passport.id,
                });
            }
        }
        if !person.is_enforced() {
            return Err(RepoError::Inconsistent(
                "passport does not point back at its person",
            ));
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // The person row references the passport, so the passport goes first.
        let passport_id = match person.passport.as_mut() {
            Some(passport) => {
                tx.execute(
                    "INSERT INTO passports (uuid, name, valid) VALUES (?1, ?2, ?3);",
                    params![
                        passport.key.to_string(),
                        passport.name.as_str(),
                        bool_to_int(passport.valid),
                    ],
                )?;
                passport.id = tx.last_insert_rowid();
                Some(passport.id)
            }
            None => None,
        };

        tx.execute(
            "INSERT INTO persons (uuid, name, passport_id) VALUES (?1, ?2, ?3);",
            params![person.key.to_string(), person.name.as_str(), passport_id],
        )?;
        person.id = tx.last_insert_rowid();
        person.enforce();

        tx.commit()?;
        Ok(person)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} WHERE p.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }

        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERSON_SELECT_SQL} ORDER BY p.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut persons = Vec::new();
        while let Some(row) = rows.next()? {
            persons.push(parse_person_row(row)?);
        }
        Ok(persons)
    }
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let uuid: String = row.get("uuid")?;
    let id: EntityId = row.get("id")?;
    let key: Key<Person> = parse_key(&uuid, "persons.uuid")?;

    let passport = match row.get::<_, Option<EntityId>>("passport_id")? {
        Some(passport_id) => {
            let passport_uuid: String = row.get("passport_uuid")?;
            Some(Passport {
                id: passport_id,
                key: parse_key(&passport_uuid, "passports.uuid")?,
                name: row.get("passport_name")?,
                valid: parse_bool(row.get("passport_valid")?, "passports.valid")?,
                person: Some(Ref::new(id, key)),
            })
        }
        None => None,
    };

    Ok(Person {
        id,
        key,
        name: row.get("name")?,
        passport,
    })
}

