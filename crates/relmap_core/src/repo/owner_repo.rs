//! Owner/device persistence (one-to-many).
//!
//! # Invariants
//! - Device order is stored in `devices.position` and restored on read.
//! - `replace_devices` swaps the whole collection in one transaction.

use crate::link::{one_to_many_holds, Enforce};
use crate::model::key::{EntityId, Key, Ref, UNASSIGNED_ID};
use crate::model::owner::{Device, Owner};
use crate::repo::store::{parse_key, row_exists, RepoError, RepoResult, SqliteStore, Store};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

/// Owner store with whole-collection replacement.
pub trait OwnerStore: Store<Owner> {
    /// Replaces every device of `owner_id` with `devices`, in order.
    ///
    /// Devices must be transient and already point back at the owner.
    fn replace_devices(&mut self, owner_id: EntityId, devices: Vec<Device>) -> RepoResult<Owner>;
}

impl Store<Owner> for SqliteStore<'_> {
    fn save(&mut self, mut owner: Owner) -> RepoResult<Owner> {
        if owner.id != UNASSIGNED_ID {
            return Err(RepoError::AlreadyPersisted {
                entity: "owner",
                id: owner.id,
            });
        }
        ensure_transient(owner.laptops.as_deref().unwrap_or_default())?;
        if !owner.is_enforced() {
            return Err(RepoError::Inconsistent(
                "device does not point back at its owner",
            ));
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO owners (uuid, name) VALUES (?1, ?2);",
            params![owner.key.to_string(), owner.name.as_str()],
        )?;
        owner.id = tx.last_insert_rowid();
        owner.enforce();

        if let Some(laptops) = owner.laptops.as_mut() {
            insert_devices(&tx, owner.id, laptops)?;
        }

        tx.commit()?;
        Ok(owner)
    }

    fn find_by_id(&self, id: EntityId) -> RepoResult<Option<Owner>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, uuid, name FROM owners WHERE id = ?1;",
                [id],
                OwnerRow::from_row,
            )
            .optional()?;

        row.map(|row| load_owner(self.conn, row)).transpose()
    }

    fn find_all(&self) -> RepoResult<Vec<Owner>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, uuid, name FROM owners ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut owners = Vec::new();
        while let Some(row) = rows.next()? {
            let parsed = OwnerRow::from_row(row)?;
            owners.push(load_owner(self.conn, parsed)?);
        }
        Ok(owners)
    }
}

impl OwnerStore for SqliteStore<'_> {
    fn replace_devices(
        &mut self,
        owner_id: EntityId,
        mut devices: Vec<Device>,
    ) -> RepoResult<Owner> {
        ensure_transient(&devices)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !row_exists(&tx, "owners", owner_id)? {
            return Err(RepoError::NotFound {
                entity: "owner",
                id: owner_id,
            });
        }

        let owner_uuid: String =
            tx.query_row("SELECT uuid FROM owners WHERE id = ?1;", [owner_id], |row| {
                row.get(0)
            })?;
        let owner_key: Key<Owner> = parse_key(&owner_uuid, "owners.uuid")?;
        if !one_to_many_holds(owner_key, Some(&devices)) {
            return Err(RepoError::Inconsistent(
                "device does not point back at its owner",
            ));
        }

        tx.execute("DELETE FROM devices WHERE owner_id = ?1;", [owner_id])?;
        insert_devices(&tx, owner_id, &mut devices)?;
        tx.commit()?;

        Store::<Owner>::find_by_id(self, owner_id)?.ok_or(RepoError::NotFound {
            entity: "owner",
            id: owner_id,
        })
    }
}

fn ensure_transient(devices: &[Device]) -> RepoResult<()> {
    match devices.iter().find(|device| device.id != UNASSIGNED_ID) {
        Some(device) => Err(RepoError::AlreadyPersisted {
            entity: "device",
            id: device.id,
        }),
        None => Ok(()),
    }
}

fn insert_devices(
    tx: &Transaction<'_>,
    owner_id: EntityId,
    devices: &mut [Device],
) -> RepoResult<()> {
    for (position, device) in devices.iter_mut().enumerate() {
        tx.execute(
            "INSERT INTO devices (
                uuid,
                owner_id,
                position,
                lap_name,
                lap_model,
                brand,
                lap_price
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                device.key.to_string(),
                owner_id,
                position as i64,
                device.lap_name.as_str(),
                device.lap_model.as_str(),
                device.brand.as_str(),
                device.lap_price,
            ],
        )?;
        device.id = tx.last_insert_rowid();
    }
    Ok(())
}

struct OwnerRow {
    id: EntityId,
    uuid: String,
    name: String,
}

impl OwnerRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            uuid: row.get("uuid")?,
            name: row.get("name")?,
        })
    }
}

fn load_owner(conn: &Connection, row: OwnerRow) -> RepoResult<Owner> {
    let key = parse_key(&row.uuid, "owners.uuid")?;
    let mut stmt = conn.prepare(
        "SELECT id, uuid, lap_name, lap_model, brand, lap_price
         FROM devices
         WHERE owner_id = ?1
         ORDER BY position ASC, id ASC;",
    )?;
    let mut rows = stmt.query([row.id])?;
    let mut laptops = Vec::new();
    while let Some(device_row) = rows.next()? {
        let uuid: String = device_row.get("uuid")?;
        laptops.push(Device {
            id: device_row.get("id")?,
            key: parse_key(&uuid, "devices.uuid")?,
            lap_name: device_row.get("lap_name")?,
            lap_model: device_row.get("lap_model")?,
            brand: device_row.get("brand")?,
            lap_price: device_row.get("lap_price")?,
            owner: Some(Ref::new(row.id, key)),
        });
    }

    Ok(Owner {
        id: row.id,
        key,
        name: row.name,
        laptops: Some(laptops),
    })
}
