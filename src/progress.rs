//! Test records and per-student score rollups. Percentages are always
//! derived from `marks / max_marks`, never stored.

use serde::Serialize;
use uuid::Uuid;

use crate::db::SchoolDb;
use crate::error::{DbError, Result};
use crate::model::{TestDraft, TestMark, TestRecord};
use crate::store::Collection;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestScore {
    pub test_id: String,
    pub subject: String,
    pub date: String,
    pub marks: f64,
    pub max_marks: f64,
    pub percentage: f64,
    pub grade: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProgress {
    pub student_id: String,
    pub scores: Vec<TestScore>,
    pub average_percentage: f64,
}

impl SchoolDb {
    pub fn get_all_tests(&self) -> Vec<TestRecord> {
        self.read_collection(Collection::Tests)
    }

    pub fn record_test(&mut self, draft: TestDraft) -> Result<TestRecord> {
        self.get_teacher(&draft.teacher_id)?;
        let mut tests: Vec<TestRecord> = self.read_collection(Collection::Tests);
        let test = TestRecord {
            id: Uuid::new_v4().to_string(),
            class: draft.class,
            subject: draft.subject,
            date: draft.date,
            max_marks: draft.max_marks,
            teacher_id: draft.teacher_id,
            marks: Vec::new(),
        };
        tests.push(test.clone());
        self.write_collection(Collection::Tests, &tests)?;
        Ok(test)
    }

    /// Upsert one student's graded entry on a test.
    pub fn set_test_mark(&mut self, test_id: &str, mark: TestMark) -> Result<TestRecord> {
        self.get_student(&mark.student_id)?;
        let mut tests: Vec<TestRecord> = self.read_collection(Collection::Tests);
        let test = tests
            .iter_mut()
            .find(|t| t.id == test_id)
            .ok_or_else(|| DbError::NotFound {
                entity: "test",
                id: test_id.to_string(),
            })?;
        match test
            .marks
            .iter_mut()
            .find(|m| m.student_id == mark.student_id)
        {
            Some(existing) => *existing = mark,
            None => test.marks.push(mark),
        }
        let updated = test.clone();
        self.write_collection(Collection::Tests, &tests)?;
        Ok(updated)
    }

    /// Score rollup across every test that graded this student.
    pub fn get_student_progress(&self, student_id: &str) -> Result<StudentProgress> {
        self.get_student(student_id)?;
        let tests: Vec<TestRecord> = self.read_collection(Collection::Tests);
        let mut scores: Vec<TestScore> = Vec::new();
        for test in &tests {
            let Some(mark) = test.marks.iter().find(|m| m.student_id == student_id) else {
                continue;
            };
            let percentage = if test.max_marks > 0.0 {
                100.0 * mark.marks / test.max_marks
            } else {
                0.0
            };
            scores.push(TestScore {
                test_id: test.id.clone(),
                subject: test.subject.clone(),
                date: test.date.clone(),
                marks: mark.marks,
                max_marks: test.max_marks,
                percentage,
                grade: mark.grade.clone(),
            });
        }
        let average_percentage = if scores.is_empty() {
            0.0
        } else {
            scores.iter().map(|s| s.percentage).sum::<f64>() / scores.len() as f64
        };
        Ok(StudentProgress {
            student_id: student_id.to_string(),
            scores,
            average_percentage,
        })
    }
}
