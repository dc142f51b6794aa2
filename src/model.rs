use serde::{Deserialize, Serialize};

/// One teacher-subject pairing on a student record. A student taught by the
/// same teacher for two subjects carries two entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherRef {
    pub teacher_id: String,
    pub teacher_name: String,
    pub subject: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub class: String,
    pub roll_number: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub guardian_name: String,
    #[serde(default)]
    pub guardian_contact: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub assigned_teachers: Vec<TeacherRef>,
    /// Derived from `assigned_teachers`; recomputed on every write so the
    /// two representations cannot drift.
    #[serde(default)]
    pub assigned_teacher_ids: Vec<String>,
    pub created_at: String,
}

impl Student {
    /// Distinct teacher ids appearing in `assigned_teachers`, first-seen order.
    pub fn derived_teacher_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for entry in &self.assigned_teachers {
            if !ids.iter().any(|id| id == &entry.teacher_id) {
                ids.push(entry.teacher_id.clone());
            }
        }
        ids
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    pub name: String,
    pub class: String,
    pub roll_number: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub guardian_name: String,
    #[serde(default)]
    pub guardian_contact: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub assigned_teachers: Vec<TeacherRef>,
}

/// Partial update; absent fields keep their stored value. `id` and
/// `created_at` are never patchable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    pub name: Option<String>,
    pub class: Option<String>,
    pub roll_number: Option<String>,
    pub contact: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_contact: Option<String>,
    pub photo: Option<Option<String>>,
    pub subjects: Option<Vec<String>>,
    pub assigned_teachers: Option<Vec<TeacherRef>>,
}

/// Weekly recurring slot. `from`/`to` are "HH:MM" strings, `from < to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub day: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub classes_assigned: Vec<String>,
    #[serde(default)]
    pub availability: Vec<AvailabilitySlot>,
    #[serde(default)]
    pub assigned_student_ids: Vec<String>,
    #[serde(default)]
    pub approved: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDraft {
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub classes_assigned: Vec<String>,
    #[serde(default)]
    pub availability: Vec<AvailabilitySlot>,
    #[serde(default)]
    pub approved: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPatch {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub classes_assigned: Option<Vec<String>>,
    pub availability: Option<Vec<AvailabilitySlot>>,
    pub approved: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Held,
    Cancelled,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Held => write!(f, "Held"),
            SessionStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkStatus {
    Present,
    Absent,
    Late,
}

/// Per-student mark inside one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentMark {
    pub student_id: String,
    pub status: MarkStatus,
    pub timestamp: String,
}

/// One teacher's class instance on one date. At most one session exists per
/// `(teacher_id, date)` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSession {
    pub id: String,
    pub teacher_id: String,
    pub date: String,
    pub subject: String,
    pub status: SessionStatus,
    #[serde(default)]
    pub students: Vec<StudentMark>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestMark {
    pub student_id: String,
    pub marks: f64,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub comments: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    pub id: String,
    pub class: String,
    pub subject: String,
    pub date: String,
    pub max_marks: f64,
    pub teacher_id: String,
    #[serde(default)]
    pub marks: Vec<TestMark>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDraft {
    pub class: String,
    pub subject: String,
    pub date: String,
    pub max_marks: f64,
    pub teacher_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "Pending Verification")]
    PendingVerification,
    Confirmed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub student_id: String,
    pub amount: f64,
    pub method: String,
    pub status: PaymentStatus,
    pub date: String,
    #[serde(default)]
    pub verified_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDraft {
    pub student_id: String,
    pub amount: f64,
    pub method: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub pinned: bool,
    /// None means visible to every class.
    #[serde(default)]
    pub class: Option<String>,
    pub expiry_date: String,
    pub author: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub class: Option<String>,
    pub expiry_date: String,
    pub author: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub pinned: Option<bool>,
    pub class: Option<Option<String>>,
    pub expiry_date: Option<String>,
}

pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub fn today_string() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
