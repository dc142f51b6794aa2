use schooldeskd::model::{StudentDraft, StudentPatch, TeacherDraft, TeacherRef};
use schooldeskd::{DbError, SchoolDb};

#[test]
fn delete_is_blocked_until_no_student_references_the_teacher() {
    let mut db = SchoolDb::in_memory();
    let t = db
        .add_teacher(TeacherDraft {
            name: "T".to_string(),
            approved: true,
            ..Default::default()
        })
        .expect("add teacher");

    let s = db
        .add_student(StudentDraft {
            name: "S".to_string(),
            class: "10A".to_string(),
            roll_number: "01".to_string(),
            assigned_teachers: vec![TeacherRef {
                teacher_id: t.id.clone(),
                teacher_name: t.name.clone(),
                subject: "Mathematics".to_string(),
            }],
            ..Default::default()
        })
        .expect("add student");

    let err = db.delete_teacher(&t.id).unwrap_err();
    match err {
        DbError::HasDependents {
            teacher_id,
            blocking,
        } => {
            assert_eq!(teacher_id, t.id);
            assert_eq!(blocking.len(), 1);
            assert_eq!(blocking[0].id, s.id);
            assert_eq!(blocking[0].name, "S");
        }
        other => panic!("expected HasDependents, got {:?}", other),
    }
    // No cascade: the teacher is still there.
    assert!(db.get_teacher(&t.id).is_ok());

    // Drop the reference, then deletion goes through.
    db.update_student(
        &s.id,
        StudentPatch {
            assigned_teachers: Some(Vec::new()),
            ..Default::default()
        },
    )
    .expect("unassign");
    db.delete_teacher(&t.id).expect("delete after unassign");
    assert!(matches!(
        db.get_teacher(&t.id),
        Err(DbError::NotFound { .. })
    ));
}

#[test]
fn availability_slots_are_validated_on_add_and_update() {
    use schooldeskd::model::AvailabilitySlot;

    let mut db = SchoolDb::in_memory();
    let backwards = TeacherDraft {
        name: "T".to_string(),
        availability: vec![AvailabilitySlot {
            day: "Monday".to_string(),
            from: "11:00".to_string(),
            to: "10:00".to_string(),
        }],
        ..Default::default()
    };
    assert!(matches!(
        db.add_teacher(backwards),
        Err(DbError::InvalidAvailability(_))
    ));

    let overlapping = TeacherDraft {
        name: "T".to_string(),
        availability: vec![
            AvailabilitySlot {
                day: "Monday".to_string(),
                from: "09:00".to_string(),
                to: "10:30".to_string(),
            },
            AvailabilitySlot {
                day: "Monday".to_string(),
                from: "10:00".to_string(),
                to: "11:00".to_string(),
            },
        ],
        ..Default::default()
    };
    assert!(matches!(
        db.add_teacher(overlapping),
        Err(DbError::InvalidAvailability(_))
    ));
    assert!(db.get_all_teachers().is_empty());

    // Same times on different days do not collide.
    let fine = TeacherDraft {
        name: "T".to_string(),
        availability: vec![
            AvailabilitySlot {
                day: "Monday".to_string(),
                from: "09:00".to_string(),
                to: "10:30".to_string(),
            },
            AvailabilitySlot {
                day: "Tuesday".to_string(),
                from: "09:00".to_string(),
                to: "10:30".to_string(),
            },
        ],
        ..Default::default()
    };
    db.add_teacher(fine).expect("valid slots");
}
