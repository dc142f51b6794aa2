use std::collections::HashSet;

use uuid::Uuid;

use crate::db::SchoolDb;
use crate::error::{DbError, Result};
use crate::model::{now_rfc3339, Student, StudentDraft, StudentPatch, Teacher, TeacherRef};
use crate::store::Collection;

fn roll_collision(students: &[Student], class: &str, roll: &str, exclude: Option<&str>) -> bool {
    students.iter().any(|s| {
        s.class == class && s.roll_number == roll && exclude.map_or(true, |id| s.id != id)
    })
}

fn id_set(ids: &[String]) -> HashSet<String> {
    ids.iter().cloned().collect()
}

impl SchoolDb {
    pub fn get_all_students(&self) -> Vec<Student> {
        self.read_collection(Collection::Students)
    }

    pub fn get_student(&self, id: &str) -> Result<Student> {
        self.get_all_students()
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| DbError::NotFound {
                entity: "student",
                id: id.to_string(),
            })
    }

    pub fn add_student(&mut self, draft: StudentDraft) -> Result<Student> {
        let mut students: Vec<Student> = self.read_collection(Collection::Students);
        if roll_collision(&students, &draft.class, &draft.roll_number, None) {
            return Err(DbError::DuplicateRollNumber {
                class: draft.class,
                roll_number: draft.roll_number,
            });
        }

        let mut student = Student {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            class: draft.class,
            roll_number: draft.roll_number,
            contact: draft.contact,
            guardian_name: draft.guardian_name,
            guardian_contact: draft.guardian_contact,
            photo: draft.photo,
            subjects: draft.subjects,
            assigned_teachers: draft.assigned_teachers,
            assigned_teacher_ids: Vec::new(),
            created_at: now_rfc3339(),
        };
        student.assigned_teacher_ids = student.derived_teacher_ids();

        let new_ids = id_set(&student.assigned_teacher_ids);
        students.push(student.clone());
        self.write_collection(Collection::Students, &students)?;
        self.sync_assignments(&student.id, &HashSet::new(), &new_ids)?;
        Ok(student)
    }

    pub fn update_student(&mut self, id: &str, patch: StudentPatch) -> Result<Student> {
        let mut students: Vec<Student> = self.read_collection(Collection::Students);
        let idx = students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| DbError::NotFound {
                entity: "student",
                id: id.to_string(),
            })?;

        let class = patch.class.clone().unwrap_or_else(|| students[idx].class.clone());
        let roll = patch
            .roll_number
            .clone()
            .unwrap_or_else(|| students[idx].roll_number.clone());
        if roll_collision(&students, &class, &roll, Some(id)) {
            return Err(DbError::DuplicateRollNumber {
                class,
                roll_number: roll,
            });
        }

        let old_ids = id_set(&students[idx].assigned_teacher_ids);

        let s = &mut students[idx];
        s.class = class;
        s.roll_number = roll;
        if let Some(name) = patch.name {
            s.name = name;
        }
        if let Some(contact) = patch.contact {
            s.contact = contact;
        }
        if let Some(guardian_name) = patch.guardian_name {
            s.guardian_name = guardian_name;
        }
        if let Some(guardian_contact) = patch.guardian_contact {
            s.guardian_contact = guardian_contact;
        }
        if let Some(photo) = patch.photo {
            s.photo = photo;
        }
        if let Some(subjects) = patch.subjects {
            s.subjects = subjects;
        }
        if let Some(assigned) = patch.assigned_teachers {
            s.assigned_teachers = assigned;
        }
        s.assigned_teacher_ids = s.derived_teacher_ids();

        let updated = s.clone();
        let new_ids = id_set(&updated.assigned_teacher_ids);
        self.write_collection(Collection::Students, &students)?;
        self.sync_assignments(id, &old_ids, &new_ids)?;
        Ok(updated)
    }

    pub fn delete_student(&mut self, id: &str) -> Result<Student> {
        let mut students: Vec<Student> = self.read_collection(Collection::Students);
        let idx = students
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| DbError::NotFound {
                entity: "student",
                id: id.to_string(),
            })?;
        let removed = students.remove(idx);
        self.write_collection(Collection::Students, &students)?;
        self.sync_assignments(id, &id_set(&removed.assigned_teacher_ids), &HashSet::new())?;
        Ok(removed)
    }

    /// Assign one approved teacher to many students at once. Idempotent per
    /// student; both collections are written once, not once per student.
    pub fn bulk_assign_teacher(
        &mut self,
        teacher_id: &str,
        subject: &str,
        student_ids: &[String],
    ) -> Result<Teacher> {
        let mut teachers: Vec<Teacher> = self.read_collection(Collection::Teachers);
        let t_idx = teachers
            .iter()
            .position(|t| t.id == teacher_id)
            .ok_or_else(|| DbError::NotFound {
                entity: "teacher",
                id: teacher_id.to_string(),
            })?;
        if !teachers[t_idx].approved {
            return Err(DbError::TeacherNotApproved(teacher_id.to_string()));
        }

        let mut students: Vec<Student> = self.read_collection(Collection::Students);
        // All-or-nothing: verify every target before touching anything.
        for sid in student_ids {
            if !students.iter().any(|s| &s.id == sid) {
                return Err(DbError::NotFound {
                    entity: "student",
                    id: sid.clone(),
                });
            }
        }

        let teacher_name = teachers[t_idx].name.clone();
        let mut students_changed = false;
        let mut teacher_changed = false;
        for s in students.iter_mut().filter(|s| student_ids.contains(&s.id)) {
            let already = s
                .assigned_teachers
                .iter()
                .any(|r| r.teacher_id == teacher_id && r.subject == subject);
            if !already {
                s.assigned_teachers.push(TeacherRef {
                    teacher_id: teacher_id.to_string(),
                    teacher_name: teacher_name.clone(),
                    subject: subject.to_string(),
                });
                s.assigned_teacher_ids = s.derived_teacher_ids();
                students_changed = true;
            }
            if !teachers[t_idx].assigned_student_ids.iter().any(|id| id == &s.id) {
                teachers[t_idx].assigned_student_ids.push(s.id.clone());
                teacher_changed = true;
            }
        }

        if students_changed {
            self.write_collection(Collection::Students, &students)?;
        }
        let result = teachers[t_idx].clone();
        if teacher_changed {
            self.write_collection(Collection::Teachers, &teachers)?;
        }
        Ok(result)
    }
}
