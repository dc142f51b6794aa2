//! Attendance sessions and the read-side aggregator. All aggregates are
//! recomputed from the raw session collection on every call; nothing here
//! is cached or incrementally maintained.

use serde::Serialize;
use uuid::Uuid;

use crate::db::SchoolDb;
use crate::error::{DbError, Result};
use crate::model::{now_rfc3339, AttendanceSession, MarkStatus, SessionStatus, StudentMark};
use crate::store::Collection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceBucket {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    /// `round(100 * (present + late) / total)`. A late arrival is not an
    /// absence. Zero when no sessions were counted.
    pub percentage: i64,
}

impl AttendanceBucket {
    fn count(&mut self, status: MarkStatus) {
        self.total += 1;
        match status {
            MarkStatus::Present => self.present += 1,
            MarkStatus::Absent => self.absent += 1,
            MarkStatus::Late => self.late += 1,
        }
    }

    fn finish(&mut self) {
        self.percentage = percentage(self.present + self.late, self.total);
    }
}

pub(crate) fn percentage(attended: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    (100.0 * attended as f64 / total as f64).round() as i64
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAttendance {
    pub subject: String,
    #[serde(flatten)]
    pub bucket: AttendanceBucket,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub student_id: String,
    pub overall: AttendanceBucket,
    pub by_subject: Vec<SubjectAttendance>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherMonthReport {
    pub scheduled_days: usize,
    pub held_days: usize,
    pub cancelled_days: usize,
}

impl SchoolDb {
    pub fn get_all_sessions(&self) -> Vec<AttendanceSession> {
        self.read_collection(Collection::Attendance)
    }

    pub fn get_session(&self, teacher_id: &str, date: &str) -> Option<AttendanceSession> {
        self.get_all_sessions()
            .into_iter()
            .find(|s| s.teacher_id == teacher_id && s.date == date)
    }

    /// Create or update the one session for `(teacher_id, date)`. An update
    /// replaces subject and status but keeps existing marks; clearing marks
    /// is the holiday path's job.
    pub fn upsert_session(
        &mut self,
        teacher_id: &str,
        date: &str,
        subject: &str,
        status: SessionStatus,
    ) -> Result<AttendanceSession> {
        self.get_teacher(teacher_id)?;
        let mut sessions: Vec<AttendanceSession> = self.read_collection(Collection::Attendance);
        let session = match sessions
            .iter_mut()
            .find(|s| s.teacher_id == teacher_id && s.date == date)
        {
            Some(existing) => {
                existing.subject = subject.to_string();
                existing.status = status;
                existing.clone()
            }
            None => {
                let created = AttendanceSession {
                    id: Uuid::new_v4().to_string(),
                    teacher_id: teacher_id.to_string(),
                    date: date.to_string(),
                    subject: subject.to_string(),
                    status,
                    students: Vec::new(),
                };
                sessions.push(created.clone());
                created
            }
        };
        self.write_collection(Collection::Attendance, &sessions)?;
        Ok(session)
    }

    /// Record one student's mark on a held session. Re-marking the same
    /// student replaces the earlier mark.
    pub fn mark_student_attendance(
        &mut self,
        teacher_id: &str,
        date: &str,
        student_id: &str,
        status: MarkStatus,
    ) -> Result<AttendanceSession> {
        self.get_student(student_id)?;
        let mut sessions: Vec<AttendanceSession> = self.read_collection(Collection::Attendance);
        let session = sessions
            .iter_mut()
            .find(|s| s.teacher_id == teacher_id && s.date == date)
            .ok_or_else(|| DbError::NotFound {
                entity: "attendance session",
                id: format!("{}@{}", teacher_id, date),
            })?;
        if session.status != SessionStatus::Held {
            return Err(DbError::InvalidSessionState {
                session_id: session.id.clone(),
                status: session.status,
            });
        }

        let mark = StudentMark {
            student_id: student_id.to_string(),
            status,
            timestamp: now_rfc3339(),
        };
        match session
            .students
            .iter_mut()
            .find(|m| m.student_id == student_id)
        {
            Some(existing) => *existing = mark,
            None => session.students.push(mark),
        }
        let updated = session.clone();
        self.write_collection(Collection::Attendance, &sessions)?;
        Ok(updated)
    }

    /// Cancel every session in the inclusive date range and discard its
    /// marks. Returns how many sessions were affected.
    pub fn mark_holidays(&mut self, from: &str, to: &str) -> Result<usize> {
        let mut sessions: Vec<AttendanceSession> = self.read_collection(Collection::Attendance);
        let mut affected = 0usize;
        for s in &mut sessions {
            if s.date.as_str() >= from && s.date.as_str() <= to {
                s.status = SessionStatus::Cancelled;
                s.students.clear();
                affected += 1;
            }
        }
        if affected > 0 {
            self.write_collection(Collection::Attendance, &sessions)?;
        }
        Ok(affected)
    }

    /// Per-subject and overall attendance for one student over an inclusive
    /// date range. Only held sessions count; a cancelled session contributes
    /// nothing even if it still carries stale marks.
    pub fn get_student_attendance_summary(
        &self,
        student_id: &str,
        since: &str,
        to: &str,
    ) -> AttendanceSummary {
        let sessions: Vec<AttendanceSession> = self.read_collection(Collection::Attendance);
        let mut overall = AttendanceBucket::default();
        let mut by_subject: Vec<SubjectAttendance> = Vec::new();

        for session in &sessions {
            if session.status != SessionStatus::Held {
                continue;
            }
            if session.date.as_str() < since || session.date.as_str() > to {
                continue;
            }
            let Some(mark) = session.students.iter().find(|m| m.student_id == student_id)
            else {
                continue;
            };
            overall.count(mark.status);
            match by_subject.iter_mut().find(|b| b.subject == session.subject) {
                Some(entry) => entry.bucket.count(mark.status),
                None => {
                    let mut bucket = AttendanceBucket::default();
                    bucket.count(mark.status);
                    by_subject.push(SubjectAttendance {
                        subject: session.subject.clone(),
                        bucket,
                    });
                }
            }
        }

        overall.finish();
        for entry in &mut by_subject {
            entry.bucket.finish();
        }
        AttendanceSummary {
            student_id: student_id.to_string(),
            overall,
            by_subject,
        }
    }

    /// Session counts for one teacher in one calendar month. The range is a
    /// lexicographic "YYYY-MM-01".."YYYY-MM-31" comparison; the upper bound
    /// is deliberately tolerant of short months because no session dates
    /// beyond month-end exist.
    pub fn get_attendance_by_teacher_and_month(
        &self,
        teacher_id: &str,
        year: i32,
        month: u32,
    ) -> TeacherMonthReport {
        let start = format!("{:04}-{:02}-01", year, month);
        let end = format!("{:04}-{:02}-31", year, month);
        let sessions: Vec<AttendanceSession> = self.read_collection(Collection::Attendance);

        let mut report = TeacherMonthReport::default();
        for s in &sessions {
            if s.teacher_id != teacher_id {
                continue;
            }
            if s.date < start || s.date > end {
                continue;
            }
            report.scheduled_days += 1;
            match s.status {
                SessionStatus::Held => report.held_days += 1,
                SessionStatus::Cancelled => report.cancelled_days += 1,
            }
        }
        report
    }
}
