use schooldeskd::model::{StudentDraft, StudentPatch};
use schooldeskd::{DbError, SchoolDb};

fn draft(name: &str, class: &str, roll: &str) -> StudentDraft {
    StudentDraft {
        name: name.to_string(),
        class: class.to_string(),
        roll_number: roll.to_string(),
        ..Default::default()
    }
}

#[test]
fn duplicate_roll_in_same_class_is_rejected_and_store_unchanged() {
    let mut db = SchoolDb::in_memory();
    let a = db.add_student(draft("A", "10A", "01")).expect("add A");

    let err = db.add_student(draft("B", "10A", "01")).unwrap_err();
    match err {
        DbError::DuplicateRollNumber { class, roll_number } => {
            assert_eq!(class, "10A");
            assert_eq!(roll_number, "01");
        }
        other => panic!("expected DuplicateRollNumber, got {:?}", other),
    }

    let students = db.get_all_students();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].id, a.id);
}

#[test]
fn same_roll_in_different_class_is_fine() {
    let mut db = SchoolDb::in_memory();
    db.add_student(draft("A", "10A", "01")).expect("add A");
    db.add_student(draft("B", "10B", "01")).expect("add B");
    assert_eq!(db.get_all_students().len(), 2);
}

#[test]
fn update_collision_with_another_student_is_rejected() {
    let mut db = SchoolDb::in_memory();
    db.add_student(draft("A", "10A", "01")).expect("add A");
    let b = db.add_student(draft("B", "10A", "02")).expect("add B");

    let err = db
        .update_student(
            &b.id,
            StudentPatch {
                roll_number: Some("01".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, DbError::DuplicateRollNumber { .. }));

    // Rejected mutation left the record as it was.
    let b_after = db.get_student(&b.id).expect("B still there");
    assert_eq!(b_after.roll_number, "02");
}

#[test]
fn update_keeping_own_roll_is_not_a_collision() {
    let mut db = SchoolDb::in_memory();
    let a = db.add_student(draft("A", "10A", "01")).expect("add A");
    let updated = db
        .update_student(
            &a.id,
            StudentPatch {
                name: Some("A renamed".to_string()),
                ..Default::default()
            },
        )
        .expect("rename");
    assert_eq!(updated.name, "A renamed");
    assert_eq!(updated.roll_number, "01");
    assert_eq!(updated.id, a.id);
    assert_eq!(updated.created_at, a.created_at);
}

#[test]
fn missing_ids_surface_not_found() {
    let mut db = SchoolDb::in_memory();
    assert!(matches!(
        db.update_student("nope", StudentPatch::default()),
        Err(DbError::NotFound { .. })
    ));
    assert!(matches!(
        db.delete_student("nope"),
        Err(DbError::NotFound { .. })
    ));
    assert!(matches!(
        db.get_student("nope"),
        Err(DbError::NotFound { .. })
    ));
}
