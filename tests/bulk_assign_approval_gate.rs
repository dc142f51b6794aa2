use schooldeskd::model::{StudentDraft, TeacherDraft};
use schooldeskd::{DbError, SchoolDb};

fn three_students(db: &mut SchoolDb) -> Vec<String> {
    (1..=3)
        .map(|i| {
            db.add_student(StudentDraft {
                name: format!("S{}", i),
                class: "10A".to_string(),
                roll_number: format!("{:02}", i),
                ..Default::default()
            })
            .expect("add student")
            .id
        })
        .collect()
}

#[test]
fn unapproved_teacher_cannot_be_bulk_assigned() {
    let mut db = SchoolDb::in_memory();
    let t = db
        .add_teacher(TeacherDraft {
            name: "T".to_string(),
            approved: false,
            ..Default::default()
        })
        .expect("add teacher");
    let ids = three_students(&mut db);

    let err = db
        .bulk_assign_teacher(&t.id, "Mathematics", &ids)
        .unwrap_err();
    assert!(matches!(err, DbError::TeacherNotApproved(_)));

    // None of the students changed.
    for s in db.get_all_students() {
        assert!(s.assigned_teacher_ids.is_empty());
        assert!(s.assigned_teachers.is_empty());
    }
    assert!(db.get_teacher(&t.id).unwrap().assigned_student_ids.is_empty());
}

#[test]
fn bulk_assign_links_both_sides_and_is_idempotent() {
    let mut db = SchoolDb::in_memory();
    let t = db
        .add_teacher(TeacherDraft {
            name: "T".to_string(),
            approved: true,
            ..Default::default()
        })
        .expect("add teacher");
    let ids = three_students(&mut db);

    let after = db
        .bulk_assign_teacher(&t.id, "Mathematics", &ids)
        .expect("bulk assign");
    assert_eq!(after.assigned_student_ids.len(), 3);
    for s in db.get_all_students() {
        assert_eq!(s.assigned_teacher_ids, vec![t.id.clone()]);
        assert_eq!(s.assigned_teachers.len(), 1);
        assert_eq!(s.assigned_teachers[0].subject, "Mathematics");
    }

    // Second call with the same arguments changes nothing.
    let again = db
        .bulk_assign_teacher(&t.id, "Mathematics", &ids)
        .expect("repeat bulk assign");
    assert_eq!(again.assigned_student_ids.len(), 3);
    for s in db.get_all_students() {
        assert_eq!(s.assigned_teachers.len(), 1);
        assert_eq!(s.assigned_teacher_ids.len(), 1);
    }
}

#[test]
fn same_teacher_different_subject_adds_a_second_pairing_not_a_second_id() {
    let mut db = SchoolDb::in_memory();
    let t = db
        .add_teacher(TeacherDraft {
            name: "T".to_string(),
            approved: true,
            ..Default::default()
        })
        .expect("add teacher");
    let ids = three_students(&mut db);

    db.bulk_assign_teacher(&t.id, "Mathematics", &ids)
        .expect("assign maths");
    db.bulk_assign_teacher(&t.id, "Physics", &ids)
        .expect("assign physics");

    for s in db.get_all_students() {
        assert_eq!(s.assigned_teachers.len(), 2);
        assert_eq!(s.assigned_teacher_ids, vec![t.id.clone()]);
    }
    let t_after = db.get_teacher(&t.id).expect("teacher");
    assert_eq!(t_after.assigned_student_ids.len(), 3);
}

#[test]
fn bulk_assign_with_an_unknown_student_is_all_or_nothing() {
    let mut db = SchoolDb::in_memory();
    let t = db
        .add_teacher(TeacherDraft {
            name: "T".to_string(),
            approved: true,
            ..Default::default()
        })
        .expect("add teacher");
    let mut ids = three_students(&mut db);
    ids.push("ghost".to_string());

    let err = db
        .bulk_assign_teacher(&t.id, "Mathematics", &ids)
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));
    for s in db.get_all_students() {
        assert!(s.assigned_teachers.is_empty());
    }
}
