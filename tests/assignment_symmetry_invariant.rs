//! Randomized operation sequences against the student↔teacher assignment
//! graph. After every mutation the two collections must agree exactly:
//! a teacher lists a student iff that student lists the teacher.

use rand::prelude::*;
use rand::rngs::StdRng;

use schooldeskd::model::{StudentDraft, StudentPatch, TeacherDraft, TeacherRef};
use schooldeskd::SchoolDb;

const SUBJECTS: [&str; 4] = ["Mathematics", "Physics", "Chemistry", "English"];

fn assert_symmetry(db: &SchoolDb) {
    let students = db.get_all_students();
    let teachers = db.get_all_teachers();
    for t in &teachers {
        for s in &students {
            let teacher_lists = t.assigned_student_ids.iter().any(|id| id == &s.id);
            let student_lists = s.assigned_teacher_ids.iter().any(|id| id == &t.id);
            assert_eq!(
                teacher_lists, student_lists,
                "cross-reference mismatch between teacher {} and student {}",
                t.id, s.id
            );
        }
        for sid in &t.assigned_student_ids {
            assert!(
                students.iter().any(|s| &s.id == sid),
                "teacher {} references deleted student {}",
                t.id,
                sid
            );
        }
    }
    // Derived ids must match the assignment entries on every student.
    for s in &students {
        assert_eq!(s.assigned_teacher_ids, s.derived_teacher_ids());
    }
}

fn random_refs(rng: &mut StdRng, teacher_ids: &[(String, String)]) -> Vec<TeacherRef> {
    let mut refs = Vec::new();
    for (id, name) in teacher_ids {
        if rng.gen_bool(0.4) {
            refs.push(TeacherRef {
                teacher_id: id.clone(),
                teacher_name: name.clone(),
                subject: SUBJECTS[rng.gen_range(0..SUBJECTS.len())].to_string(),
            });
        }
    }
    refs
}

fn seeded_teachers(db: &mut SchoolDb, count: usize) -> Vec<(String, String)> {
    (0..count)
        .map(|i| {
            let t = db
                .add_teacher(TeacherDraft {
                    name: format!("Teacher {}", i),
                    approved: true,
                    ..Default::default()
                })
                .expect("add teacher");
            (t.id, t.name)
        })
        .collect()
}

#[test]
fn symmetry_holds_under_randomized_operation_sequences() {
    for seed in [7u64, 1924, 550291] {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut db = SchoolDb::in_memory();
        let teacher_ids = seeded_teachers(&mut db, 4);
        let mut roll = 0usize;

        for _ in 0..200 {
            let students = db.get_all_students();
            match rng.gen_range(0..4) {
                0 => {
                    roll += 1;
                    db.add_student(StudentDraft {
                        name: format!("S{}", roll),
                        class: "10A".to_string(),
                        roll_number: format!("{:03}", roll),
                        assigned_teachers: random_refs(&mut rng, &teacher_ids),
                        ..Default::default()
                    })
                    .expect("add student");
                }
                1 if !students.is_empty() => {
                    let target = &students[rng.gen_range(0..students.len())];
                    db.update_student(
                        &target.id,
                        StudentPatch {
                            assigned_teachers: Some(random_refs(&mut rng, &teacher_ids)),
                            ..Default::default()
                        },
                    )
                    .expect("update student");
                }
                2 if !students.is_empty() => {
                    let target = &students[rng.gen_range(0..students.len())];
                    db.delete_student(&target.id).expect("delete student");
                }
                3 if !students.is_empty() => {
                    // Pure reordering of existing assignments.
                    let target = &students[rng.gen_range(0..students.len())];
                    let mut shuffled = target.assigned_teachers.clone();
                    shuffled.shuffle(&mut rng);
                    db.update_student(
                        &target.id,
                        StudentPatch {
                            assigned_teachers: Some(shuffled),
                            ..Default::default()
                        },
                    )
                    .expect("reorder student");
                }
                _ => {}
            }
            assert_symmetry(&db);
        }
    }
}

#[test]
fn reassigning_the_same_set_twice_leaves_teachers_unchanged() {
    let mut db = SchoolDb::in_memory();
    let teacher_ids = seeded_teachers(&mut db, 2);
    let s = db
        .add_student(StudentDraft {
            name: "S".to_string(),
            class: "10A".to_string(),
            roll_number: "01".to_string(),
            ..Default::default()
        })
        .expect("add student");

    let refs: Vec<TeacherRef> = teacher_ids
        .iter()
        .map(|(id, name)| TeacherRef {
            teacher_id: id.clone(),
            teacher_name: name.clone(),
            subject: "Mathematics".to_string(),
        })
        .collect();

    db.update_student(
        &s.id,
        StudentPatch {
            assigned_teachers: Some(refs.clone()),
            ..Default::default()
        },
    )
    .expect("first assign");
    let snapshot = serde_json::to_value(db.get_all_teachers()).expect("snapshot");

    db.update_student(
        &s.id,
        StudentPatch {
            assigned_teachers: Some(refs),
            ..Default::default()
        },
    )
    .expect("second assign");
    let after = serde_json::to_value(db.get_all_teachers()).expect("snapshot");

    assert_eq!(snapshot, after);
    let t = db.get_teacher(&teacher_ids[0].0).expect("teacher");
    assert_eq!(
        t.assigned_student_ids.iter().filter(|id| **id == s.id).count(),
        1,
        "no duplicate entries"
    );
}

#[test]
fn reordering_assignments_does_not_touch_teachers() {
    let mut db = SchoolDb::in_memory();
    let teacher_ids = seeded_teachers(&mut db, 3);
    let refs: Vec<TeacherRef> = teacher_ids
        .iter()
        .map(|(id, name)| TeacherRef {
            teacher_id: id.clone(),
            teacher_name: name.clone(),
            subject: "Physics".to_string(),
        })
        .collect();
    let s = db
        .add_student(StudentDraft {
            name: "S".to_string(),
            class: "10A".to_string(),
            roll_number: "01".to_string(),
            assigned_teachers: refs.clone(),
            ..Default::default()
        })
        .expect("add student");

    let snapshot = serde_json::to_value(db.get_all_teachers()).expect("snapshot");

    let mut reversed = refs;
    reversed.reverse();
    db.update_student(
        &s.id,
        StudentPatch {
            assigned_teachers: Some(reversed),
            ..Default::default()
        },
    )
    .expect("reorder");

    let after = serde_json::to_value(db.get_all_teachers()).expect("snapshot");
    assert_eq!(snapshot, after);
}

#[test]
fn deleting_a_student_strips_it_from_every_teacher() {
    let mut db = SchoolDb::in_memory();
    let teacher_ids = seeded_teachers(&mut db, 2);
    let refs: Vec<TeacherRef> = teacher_ids
        .iter()
        .map(|(id, name)| TeacherRef {
            teacher_id: id.clone(),
            teacher_name: name.clone(),
            subject: "English".to_string(),
        })
        .collect();
    let s = db
        .add_student(StudentDraft {
            name: "S".to_string(),
            class: "10A".to_string(),
            roll_number: "01".to_string(),
            assigned_teachers: refs,
            ..Default::default()
        })
        .expect("add student");

    db.delete_student(&s.id).expect("delete");
    for (tid, _) in &teacher_ids {
        let t = db.get_teacher(tid).expect("teacher");
        assert!(t.assigned_student_ids.is_empty());
    }
}
