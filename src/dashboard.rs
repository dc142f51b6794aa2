//! Dashboard KPIs: whole-store counts plus the current-month attendance
//! average, recomputed from the raw collections on every call.

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::attendance::percentage;
use crate::db::SchoolDb;
use crate::model::{AttendanceSession, MarkStatus, Payment, PaymentStatus, SessionStatus, Student, Teacher, TestRecord};
use crate::store::Collection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    pub total_students: usize,
    pub total_teachers: usize,
    pub pending_payments: usize,
    pub upcoming_tests: usize,
    pub monthly_attendance_percentage: i64,
}

impl SchoolDb {
    pub fn get_dashboard_kpis(&self) -> DashboardKpis {
        self.dashboard_kpis_as_of(Utc::now().date_naive())
    }

    /// KPI computation pinned to an explicit "today" so the windows are
    /// testable.
    pub fn dashboard_kpis_as_of(&self, today: NaiveDate) -> DashboardKpis {
        let students: Vec<Student> = self.read_collection(Collection::Students);
        let teachers: Vec<Teacher> = self.read_collection(Collection::Teachers);
        let payments: Vec<Payment> = self.read_collection(Collection::Payments);
        let tests: Vec<TestRecord> = self.read_collection(Collection::Tests);
        let sessions: Vec<AttendanceSession> = self.read_collection(Collection::Attendance);

        let pending_payments = payments
            .iter()
            .filter(|p| p.status == PaymentStatus::PendingVerification)
            .count();

        let today_s = today.format("%Y-%m-%d").to_string();
        let horizon = (today + Duration::days(30)).format("%Y-%m-%d").to_string();
        let upcoming_tests = tests
            .iter()
            .filter(|t| t.date >= today_s && t.date <= horizon)
            .count();

        // Current calendar month; present marks over all marks.
        let month_prefix = today.format("%Y-%m-").to_string();
        let mut present = 0usize;
        let mut total = 0usize;
        for s in &sessions {
            if s.status != SessionStatus::Held || !s.date.starts_with(&month_prefix) {
                continue;
            }
            for mark in &s.students {
                total += 1;
                if mark.status == MarkStatus::Present {
                    present += 1;
                }
            }
        }

        DashboardKpis {
            total_students: students.len(),
            total_teachers: teachers.len(),
            pending_payments,
            upcoming_tests,
            monthly_attendance_percentage: percentage(present, total),
        }
    }
}
