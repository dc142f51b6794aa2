//! First-run seeding and forward migration. Seeds are deterministic (stable
//! ids, fixed dates) so demo workspaces and tests see the same data. On
//! every subsequent run, records persisted by older builds get their missing
//! array fields backfilled to empty arrays; a collection whose migration
//! fails is re-seeded from scratch rather than left half-migrated.

use serde::de::{DeserializeOwned, Error as _};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::db::SchoolDb;
use crate::error::Result;
use crate::model::{
    AttendanceSession, AvailabilitySlot, MarkStatus, Notice, Payment, PaymentStatus,
    SessionStatus, Student, StudentMark, Teacher, TeacherRef, TestMark, TestRecord,
};
use crate::store::Collection;

const STUDENT_ARRAY_FIELDS: &[&str] = &["subjects", "assignedTeachers", "assignedTeacherIds"];
const TEACHER_ARRAY_FIELDS: &[&str] = &[
    "subjects",
    "classesAssigned",
    "availability",
    "assignedStudentIds",
];

impl SchoolDb {
    /// Idempotent; safe to call on every open.
    pub fn ensure_seeded(&mut self) -> Result<()> {
        self.migrate_or_seed(Collection::Students, STUDENT_ARRAY_FIELDS, seed_students)?;
        self.migrate_or_seed(Collection::Teachers, TEACHER_ARRAY_FIELDS, seed_teachers)?;
        self.seed_if_empty(Collection::Attendance, seed_sessions)?;
        self.seed_if_empty(Collection::Tests, seed_tests)?;
        self.seed_if_empty(Collection::Notices, seed_notices)?;
        self.seed_if_empty(Collection::Payments, seed_payments)?;
        self.reconcile_assignments()?;
        Ok(())
    }

    fn migrate_or_seed<T: DeserializeOwned + Serialize>(
        &mut self,
        collection: Collection,
        array_fields: &[&str],
        seed: fn() -> Vec<T>,
    ) -> Result<()> {
        match self.backfill_arrays::<T>(collection, array_fields) {
            Ok(true) => Ok(()),
            Ok(false) => self.write_collection(collection, &seed()),
            Err(e) => {
                warn!(collection = collection.key(), error = %e, "migration failed; re-seeding collection");
                self.write_collection(collection, &seed())
            }
        }
    }

    /// JSON-level backfill: every named field that is missing or null
    /// becomes an empty array, so downstream code can assume the fields are
    /// always iterable. Returns false when there is nothing to migrate.
    fn backfill_arrays<T: DeserializeOwned + Serialize>(
        &mut self,
        collection: Collection,
        array_fields: &[&str],
    ) -> Result<bool> {
        let Some(blob) = self.read_raw(collection)? else {
            return Ok(false);
        };
        let mut values: Vec<serde_json::Value> = serde_json::from_str(&blob)?;
        if values.is_empty() {
            return Ok(false);
        }

        let mut changed = false;
        for value in &mut values {
            let obj = value
                .as_object_mut()
                .ok_or_else(|| serde_json::Error::custom("record is not an object"))?;
            for field in array_fields {
                if obj.get(*field).map_or(true, |v| v.is_null()) {
                    obj.insert((*field).to_string(), json!([]));
                    changed = true;
                }
            }
        }

        // The backfilled records must round-trip through the typed model;
        // anything else is a failed migration.
        let typed: Vec<T> = serde_json::from_value(serde_json::Value::Array(values))?;
        if changed {
            self.write_collection(collection, &typed)?;
        }
        Ok(true)
    }

    fn seed_if_empty<T: Serialize>(
        &mut self,
        collection: Collection,
        seed: fn() -> Vec<T>,
    ) -> Result<()> {
        let empty = match self.read_raw(collection)? {
            None => true,
            Some(blob) => serde_json::from_str::<Vec<serde_json::Value>>(&blob)
                .map(|v| v.is_empty())
                .unwrap_or(true),
        };
        if empty {
            self.write_collection(collection, &seed())?;
        }
        Ok(())
    }
}

const SEED_STAMP: &str = "2025-04-01T08:00:00+00:00";

fn seed_teachers() -> Vec<Teacher> {
    vec![
        Teacher {
            id: "seed-t-01".to_string(),
            name: "Anita Rao".to_string(),
            contact: "anita.rao@example.edu".to_string(),
            subjects: vec!["Mathematics".to_string(), "Physics".to_string()],
            classes_assigned: vec!["10A".to_string(), "10B".to_string()],
            availability: vec![
                AvailabilitySlot {
                    day: "Monday".to_string(),
                    from: "09:00".to_string(),
                    to: "10:30".to_string(),
                },
                AvailabilitySlot {
                    day: "Wednesday".to_string(),
                    from: "11:00".to_string(),
                    to: "12:30".to_string(),
                },
            ],
            assigned_student_ids: vec!["seed-s-01".to_string(), "seed-s-02".to_string()],
            approved: true,
            created_at: SEED_STAMP.to_string(),
        },
        Teacher {
            id: "seed-t-02".to_string(),
            name: "Vikram Shah".to_string(),
            contact: "vikram.shah@example.edu".to_string(),
            subjects: vec!["Chemistry".to_string()],
            classes_assigned: vec!["10A".to_string()],
            availability: vec![AvailabilitySlot {
                day: "Tuesday".to_string(),
                from: "10:00".to_string(),
                to: "11:00".to_string(),
            }],
            assigned_student_ids: Vec::new(),
            approved: false,
            created_at: SEED_STAMP.to_string(),
        },
    ]
}

fn seed_students() -> Vec<Student> {
    let rao_math = TeacherRef {
        teacher_id: "seed-t-01".to_string(),
        teacher_name: "Anita Rao".to_string(),
        subject: "Mathematics".to_string(),
    };
    vec![
        Student {
            id: "seed-s-01".to_string(),
            name: "Meera Iyer".to_string(),
            class: "10A".to_string(),
            roll_number: "01".to_string(),
            contact: "".to_string(),
            guardian_name: "Lakshmi Iyer".to_string(),
            guardian_contact: "".to_string(),
            photo: None,
            subjects: vec!["Mathematics".to_string(), "Chemistry".to_string()],
            assigned_teachers: vec![rao_math.clone()],
            assigned_teacher_ids: vec!["seed-t-01".to_string()],
            created_at: SEED_STAMP.to_string(),
        },
        Student {
            id: "seed-s-02".to_string(),
            name: "Arjun Menon".to_string(),
            class: "10A".to_string(),
            roll_number: "02".to_string(),
            contact: "".to_string(),
            guardian_name: "Devi Menon".to_string(),
            guardian_contact: "".to_string(),
            photo: None,
            subjects: vec!["Mathematics".to_string()],
            assigned_teachers: vec![rao_math],
            assigned_teacher_ids: vec!["seed-t-01".to_string()],
            created_at: SEED_STAMP.to_string(),
        },
        Student {
            id: "seed-s-03".to_string(),
            name: "Sara Khan".to_string(),
            class: "10B".to_string(),
            roll_number: "01".to_string(),
            contact: "".to_string(),
            guardian_name: "Imran Khan".to_string(),
            guardian_contact: "".to_string(),
            photo: None,
            subjects: vec!["Physics".to_string()],
            assigned_teachers: Vec::new(),
            assigned_teacher_ids: Vec::new(),
            created_at: SEED_STAMP.to_string(),
        },
    ]
}

fn seed_sessions() -> Vec<AttendanceSession> {
    vec![
        AttendanceSession {
            id: "seed-a-01".to_string(),
            teacher_id: "seed-t-01".to_string(),
            date: "2025-04-07".to_string(),
            subject: "Mathematics".to_string(),
            status: SessionStatus::Held,
            students: vec![
                StudentMark {
                    student_id: "seed-s-01".to_string(),
                    status: MarkStatus::Present,
                    timestamp: SEED_STAMP.to_string(),
                },
                StudentMark {
                    student_id: "seed-s-02".to_string(),
                    status: MarkStatus::Late,
                    timestamp: SEED_STAMP.to_string(),
                },
            ],
        },
        AttendanceSession {
            id: "seed-a-02".to_string(),
            teacher_id: "seed-t-01".to_string(),
            date: "2025-04-09".to_string(),
            subject: "Mathematics".to_string(),
            status: SessionStatus::Cancelled,
            students: Vec::new(),
        },
    ]
}

fn seed_tests() -> Vec<TestRecord> {
    vec![TestRecord {
        id: "seed-x-01".to_string(),
        class: "10A".to_string(),
        subject: "Mathematics".to_string(),
        date: "2025-04-15".to_string(),
        max_marks: 50.0,
        teacher_id: "seed-t-01".to_string(),
        marks: vec![TestMark {
            student_id: "seed-s-01".to_string(),
            marks: 42.0,
            grade: "A".to_string(),
            comments: "Strong algebra work".to_string(),
        }],
    }]
}

fn seed_notices() -> Vec<Notice> {
    vec![Notice {
        id: "seed-n-01".to_string(),
        title: "Summer term begins".to_string(),
        content: "Classes resume Monday the 7th.".to_string(),
        pinned: true,
        class: None,
        expiry_date: "2025-05-01".to_string(),
        author: "Office".to_string(),
    }]
}

fn seed_payments() -> Vec<Payment> {
    vec![Payment {
        id: "seed-p-01".to_string(),
        student_id: "seed-s-01".to_string(),
        amount: 1500.0,
        method: "UPI".to_string(),
        status: PaymentStatus::PendingVerification,
        date: "2025-04-03".to_string(),
        verified_at: None,
    }]
}
