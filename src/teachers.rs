use uuid::Uuid;

use crate::db::SchoolDb;
use crate::error::{BlockingStudent, DbError, Result};
use crate::model::{now_rfc3339, AvailabilitySlot, Student, Teacher, TeacherDraft, TeacherPatch};
use crate::store::Collection;

/// Weekly slots must be well-formed and non-overlapping within a day.
fn validate_availability(slots: &[AvailabilitySlot]) -> Result<()> {
    for slot in slots {
        if slot.from >= slot.to {
            return Err(DbError::InvalidAvailability(format!(
                "{} slot {}-{} does not end after it starts",
                slot.day, slot.from, slot.to
            )));
        }
    }
    let mut by_day: Vec<&AvailabilitySlot> = slots.iter().collect();
    by_day.sort_by(|a, b| (&a.day, &a.from).cmp(&(&b.day, &b.from)));
    for pair in by_day.windows(2) {
        if pair[0].day == pair[1].day && pair[1].from < pair[0].to {
            return Err(DbError::InvalidAvailability(format!(
                "{} slots {}-{} and {}-{} overlap",
                pair[0].day, pair[0].from, pair[0].to, pair[1].from, pair[1].to
            )));
        }
    }
    Ok(())
}

impl SchoolDb {
    pub fn get_all_teachers(&self) -> Vec<Teacher> {
        self.read_collection(Collection::Teachers)
    }

    pub fn get_teacher(&self, id: &str) -> Result<Teacher> {
        self.get_all_teachers()
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| DbError::NotFound {
                entity: "teacher",
                id: id.to_string(),
            })
    }

    pub fn add_teacher(&mut self, draft: TeacherDraft) -> Result<Teacher> {
        validate_availability(&draft.availability)?;
        let mut teachers: Vec<Teacher> = self.read_collection(Collection::Teachers);
        let teacher = Teacher {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            contact: draft.contact,
            subjects: draft.subjects,
            classes_assigned: draft.classes_assigned,
            availability: draft.availability,
            assigned_student_ids: Vec::new(),
            approved: draft.approved,
            created_at: now_rfc3339(),
        };
        teachers.push(teacher.clone());
        self.write_collection(Collection::Teachers, &teachers)?;
        Ok(teacher)
    }

    pub fn update_teacher(&mut self, id: &str, patch: TeacherPatch) -> Result<Teacher> {
        if let Some(slots) = &patch.availability {
            validate_availability(slots)?;
        }
        let mut teachers: Vec<Teacher> = self.read_collection(Collection::Teachers);
        let t = teachers
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| DbError::NotFound {
                entity: "teacher",
                id: id.to_string(),
            })?;
        if let Some(name) = patch.name {
            t.name = name;
        }
        if let Some(contact) = patch.contact {
            t.contact = contact;
        }
        if let Some(subjects) = patch.subjects {
            t.subjects = subjects;
        }
        if let Some(classes) = patch.classes_assigned {
            t.classes_assigned = classes;
        }
        if let Some(slots) = patch.availability {
            t.availability = slots;
        }
        if let Some(approved) = patch.approved {
            t.approved = approved;
        }
        // assigned_student_ids is owned by the synchronizer; patches never
        // touch it.
        let updated = t.clone();
        self.write_collection(Collection::Teachers, &teachers)?;
        Ok(updated)
    }

    /// Deletion is blocked while any student still references the teacher;
    /// the caller gets the blocking list instead of a cascade.
    pub fn delete_teacher(&mut self, id: &str) -> Result<Teacher> {
        let mut teachers: Vec<Teacher> = self.read_collection(Collection::Teachers);
        let idx = teachers
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| DbError::NotFound {
                entity: "teacher",
                id: id.to_string(),
            })?;

        let students: Vec<Student> = self.read_collection(Collection::Students);
        let blocking: Vec<BlockingStudent> = students
            .iter()
            .filter(|s| s.assigned_teacher_ids.iter().any(|tid| tid == id))
            .map(|s| BlockingStudent {
                id: s.id.clone(),
                name: s.name.clone(),
            })
            .collect();
        if !blocking.is_empty() {
            return Err(DbError::HasDependents {
                teacher_id: id.to_string(),
                blocking,
            });
        }

        let removed = teachers.remove(idx);
        self.write_collection(Collection::Teachers, &teachers)?;
        Ok(removed)
    }
}
