use relmap_core::{
    link_many_to_many, link_one_to_many, link_one_to_one, Device, Enforce, Laptop, LibStudent,
    Library, Owner, Passport, Person, Student,
};

#[test]
fn one_to_one_back_reference_equals_owner() {
    let mut student = Student::new("Alice");
    student.laptop = Some(Laptop::new("Dell", 50_000));
    assert!(!student.is_enforced());

    link_one_to_one(student.to_ref(), student.laptop.as_mut());

    assert_eq!(student.laptop.as_ref().unwrap().student, Some(student.to_ref()));
    assert!(student.is_enforced());
}

#[test]
fn one_to_one_does_not_touch_owner() {
    let mut person = Person::new("Bea");
    let before = person.clone();
    let mut passport = Passport::new("P-1", true);

    link_one_to_one(person.to_ref(), Some(&mut passport));

    assert_eq!(passport.person, Some(person.to_ref()));
    person.enforce();
    assert_eq!(person, before);
}

#[test]
fn setter_links_both_sides() {
    let mut person = Person::new("Cid");
    person.set_passport(Some(Passport::new("P-2", false)));
    assert_eq!(person.passport.as_ref().unwrap().person, Some(person.to_ref()));

    person.set_passport(None);
    assert!(person.passport.is_none());
    assert!(person.is_enforced());
}

#[test]
fn one_to_many_fans_out_and_keeps_order() {
    let owner = Owner::new("Dana");
    let mut laptops = vec![
        Device::new("zeta", "z1", "Lenovo", 10),
        Device::new("alpha", "a1", "Dell", 20),
        Device::new("zeta", "z1", "Lenovo", 10),
    ];
    let names_before: Vec<String> = laptops.iter().map(|d| d.lap_name.clone()).collect();

    link_one_to_many(owner.to_ref(), Some(&mut laptops));

    let names_after: Vec<String> = laptops.iter().map(|d| d.lap_name.clone()).collect();
    assert_eq!(names_before, names_after);
    assert!(laptops.iter().all(|device| device.owner == Some(owner.to_ref())));
}

#[test]
fn many_to_many_adds_owner_exactly_once() {
    let student = LibStudent::new("Eve");
    let mut libraries = vec![Library::new("Dune", true), Library::new("Emma", false)];

    link_many_to_many(student.to_ref(), Some(&mut libraries));
    link_many_to_many(student.to_ref(), Some(&mut libraries));

    for library in &libraries {
        assert_eq!(library.students.len(), 1);
        assert!(library.students.contains(&student.key));
    }
}

#[test]
fn many_to_many_keeps_other_owners() {
    let first = LibStudent::new("Finn");
    let second = LibStudent::new("Gus");
    let mut shared = vec![Library::new("Ulysses", true)];

    link_many_to_many(first.to_ref(), Some(&mut shared));
    link_many_to_many(second.to_ref(), Some(&mut shared));

    assert_eq!(shared[0].students.len(), 2);
}

#[test]
fn enforcement_is_idempotent_for_every_aggregate() {
    let mut student = Student::new("Hal");
    student.laptop = Some(Laptop::new("Asus", 1));
    student.enforce();
    let once = student.clone();
    student.enforce();
    assert_eq!(student, once);

    let mut owner = Owner::new("Ivy");
    owner.laptops = Some(vec![Device::new("a", "", "", 0), Device::new("b", "", "", 0)]);
    owner.enforce();
    let once = owner.clone();
    owner.enforce();
    assert_eq!(owner, once);

    let mut lib_student = LibStudent::new("Jo");
    lib_student.libraries = Some(vec![Library::new("Ada", true)]);
    lib_student.enforce();
    let once = lib_student.clone();
    lib_student.enforce();
    assert_eq!(lib_student, once);
}

#[test]
fn absent_associations_are_noops() {
    let mut student = Student::new("Kim");
    let before = student.clone();
    student.enforce();
    assert_eq!(student, before);
    link_one_to_one::<Student, Laptop>(student.to_ref(), None);

    let mut owner = Owner::new("Lou");
    let before = owner.clone();
    owner.enforce();
    assert_eq!(owner, before);
    link_one_to_many::<Owner, Device, &mut Vec<Device>>(owner.to_ref(), None);

    let mut lib_student = LibStudent::new("Max");
    let before = lib_student.clone();
    lib_student.enforce();
    assert_eq!(lib_student, before);
    link_many_to_many::<LibStudent, Library, &mut Vec<Library>>(lib_student.to_ref(), None);
}

#[test]
fn empty_collections_are_valid() {
    let mut owner = Owner::new("Ned");
    owner.laptops = Some(Vec::new());
    owner.enforce();
    assert!(owner.is_enforced());
    assert_eq!(owner.laptops, Some(Vec::new()));
}

#[test]
fn add_library_registers_reverse_entry() {
    let mut student = LibStudent::new("Oli");
    student.add_library(Library::new("Ivanhoe", true));
    assert!(student.is_enforced());
}

#[test]
fn decoded_payload_without_keys_gets_fresh_keys() {
    let student: Student = serde_json::from_str(
        r#"{"name":"Alice","laptop":{"name":"Dell","price":50000}}"#,
    )
    .unwrap();

    assert_eq!(student.id, 0);
    let laptop = student.laptop.as_ref().unwrap();
    assert_eq!(laptop.lap_id, 0);
    assert!(laptop.student.is_none());
    assert_ne!(student.key.uuid(), laptop.key.uuid());
}
