use schooldeskd::model::{StudentDraft, TeacherDraft, TestDraft, TestMark};
use schooldeskd::SchoolDb;

#[test]
fn students_csv_reflects_current_state_and_quotes_commas() {
    let mut db = SchoolDb::in_memory();
    db.add_student(StudentDraft {
        name: "Iyer, Meera".to_string(),
        class: "10A".to_string(),
        roll_number: "01".to_string(),
        subjects: vec!["Mathematics".to_string(), "Physics".to_string()],
        ..Default::default()
    })
    .expect("student");

    let csv = db.export_students_csv();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("id,name,class,rollNumber"));
    assert!(lines[1].contains("\"Iyer, Meera\""));
    assert!(lines[1].contains("Mathematics; Physics"));
}

#[test]
fn test_marks_csv_emits_one_row_per_graded_student() {
    let mut db = SchoolDb::in_memory();
    let t = db
        .add_teacher(TeacherDraft {
            name: "T".to_string(),
            approved: true,
            ..Default::default()
        })
        .expect("teacher");
    let s1 = db
        .add_student(StudentDraft {
            name: "A".to_string(),
            class: "10A".to_string(),
            roll_number: "01".to_string(),
            ..Default::default()
        })
        .expect("student");
    let s2 = db
        .add_student(StudentDraft {
            name: "B".to_string(),
            class: "10A".to_string(),
            roll_number: "02".to_string(),
            ..Default::default()
        })
        .expect("student");

    let test = db
        .record_test(TestDraft {
            class: "10A".to_string(),
            subject: "Mathematics".to_string(),
            date: "2025-05-01".to_string(),
            max_marks: 40.0,
            teacher_id: t.id,
        })
        .expect("test");
    for (sid, marks) in [(&s1.id, 30.0), (&s2.id, 20.0)] {
        db.set_test_mark(
            &test.id,
            TestMark {
                student_id: sid.clone(),
                marks,
                grade: String::new(),
                comments: String::new(),
            },
        )
        .expect("mark");
    }

    let csv = db.export_test_marks_csv();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("75.0"));
    assert!(lines[2].contains("50.0"));
}

#[test]
fn payments_and_notices_csv_round_out_the_export_surface() {
    let mut db = SchoolDb::in_memory();
    db.ensure_seeded().expect("seed");

    let payments = db.export_payments_csv();
    assert!(payments.starts_with("id,studentId,amount,method,status,date,verifiedAt\n"));
    assert!(payments.contains("seed-p-01"));
    assert!(payments.contains("\"Pending Verification\"") || payments.contains("Pending Verification"));

    let notices = db.export_notices_csv();
    assert!(notices.starts_with("id,title,pinned,class,expiryDate,author\n"));
    assert!(notices.contains("seed-n-01"));
}
