use relmap_core::db::open_db_in_memory;
use relmap_core::{
    Assoc, Device, Owner, OwnerService, RepoError, SqliteStore, Store, UNASSIGNED_ID,
};

fn device(name: &str) -> Device {
    Device::new(name, format!("{name}-model"), "Lenovo", 1_000)
}

fn names(owner: &Owner) -> Vec<&str> {
    owner
        .laptops
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|device| device.lap_name.as_str())
        .collect()
}

#[test]
fn saving_owner_links_every_laptop_and_keeps_order() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = OwnerService::new(SqliteStore::try_new(&mut conn).unwrap());

    let mut owner = Owner::new("Ada");
    owner.laptops = Some(vec![device("zulu"), device("alpha"), device("zulu")]);

    let saved = service.add_owner(owner).unwrap();
    assert_ne!(saved.id, UNASSIGNED_ID);
    assert_eq!(names(&saved), vec!["zulu", "alpha", "zulu"]);
    for laptop in saved.laptops.as_deref().unwrap() {
        assert_ne!(laptop.id, UNASSIGNED_ID);
        assert_eq!(laptop.owner, Some(saved.to_ref()));
    }

    let loaded = service.get_owner_by_id(saved.id).unwrap().unwrap();
    assert_eq!(loaded, saved);
}

#[test]
fn owner_without_laptops_loads_with_empty_collection() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = OwnerService::new(SqliteStore::try_new(&mut conn).unwrap());

    let saved = service.add_owner(Owner::new("Bo")).unwrap();
    assert!(saved.laptops.is_none());

    let loaded = service.get_owner_by_id(saved.id).unwrap().unwrap();
    assert_eq!(loaded.laptops, Some(Vec::new()));
}

#[test]
fn absent_update_keeps_laptops() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = OwnerService::new(SqliteStore::try_new(&mut conn).unwrap());

    let mut owner = Owner::new("Cy");
    owner.laptops = Some(vec![device("one")]);
    let saved = service.add_owner(owner).unwrap();

    let updated = service.update_laptops(saved.id, Assoc::Absent).unwrap();
    assert_eq!(updated, saved);
}

#[test]
fn cleared_update_removes_laptops() {
    let mut conn = open_db_in_memory().unwrap();
    let owner_id = {
        let mut service = OwnerService::new(SqliteStore::try_new(&mut conn).unwrap());
        let mut owner = Owner::new("Di");
        owner.laptops = Some(vec![device("one"), device("two")]);
        let saved = service.add_owner(owner).unwrap();

        let updated = service.update_laptops(saved.id, Assoc::Cleared).unwrap();
        assert_eq!(updated.laptops, Some(Vec::new()));
        saved.id
    };

    let remaining: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM devices WHERE owner_id = ?1;",
            [owner_id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn populated_update_replaces_laptops_in_order() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = OwnerService::new(SqliteStore::try_new(&mut conn).unwrap());

    let mut owner = Owner::new("Ed");
    owner.laptops = Some(vec![device("old")]);
    let saved = service.add_owner(owner).unwrap();

    let updated = service
        .update_laptops(
            saved.id,
            Assoc::Populated(vec![device("new-b"), device("new-a")]),
        )
        .unwrap();
    assert_eq!(names(&updated), vec!["new-b", "new-a"]);
    assert!(updated
        .laptops
        .as_deref()
        .unwrap()
        .iter()
        .all(|laptop| laptop.owner == Some(saved.to_ref()) && laptop.id != UNASSIGNED_ID));
}

#[test]
fn update_for_missing_owner_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = OwnerService::new(SqliteStore::try_new(&mut conn).unwrap());

    let err = service.update_laptops(77, Assoc::Cleared).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: "owner",
            id: 77
        }
    ));
}

#[test]
fn store_rejects_persisted_devices() {
    let mut conn = open_db_in_memory().unwrap();
    let mut store = SqliteStore::try_new(&mut conn).unwrap();

    let mut stale = device("stale");
    stale.id = 5;
    let mut owner = Owner::new("Flo");
    owner.set_laptops(vec![stale]);

    let err = Store::<Owner>::save(&mut store, owner).unwrap_err();
    assert!(matches!(
        err,
        RepoError::AlreadyPersisted {
            entity: "device",
            id: 5
        }
    ));
}
