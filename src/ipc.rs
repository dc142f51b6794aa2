//! JSON-line request surface for the sidecar binary. Thin adapter: every
//! method maps one-to-one onto a facade call, and all validation lives in
//! the facade so no caller can route around it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::db::SchoolDb;
use crate::error::DbError;
use crate::model::{
    MarkStatus, NoticeDraft, NoticePatch, PaymentDraft, PaymentStatus, SessionStatus,
    StudentDraft, StudentPatch, TeacherDraft, TeacherPatch, TestDraft, TestMark, today_string,
};

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

struct IpcError {
    code: &'static str,
    message: String,
    details: Option<serde_json::Value>,
}

impl From<DbError> for IpcError {
    fn from(e: DbError) -> Self {
        IpcError {
            code: e.code(),
            message: e.to_string(),
            details: e.details(),
        }
    }
}

fn bad_params(message: impl Into<String>) -> IpcError {
    IpcError {
        code: "bad_params",
        message: message.into(),
        details: None,
    }
}

fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, IpcError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| bad_params(format!("missing {}", key)))
}

fn parse_field<T: DeserializeOwned>(params: &serde_json::Value, key: &str) -> Result<T, IpcError> {
    let value = params
        .get(key)
        .cloned()
        .ok_or_else(|| bad_params(format!("missing {}", key)))?;
    serde_json::from_value(value).map_err(|e| bad_params(format!("invalid {}: {}", key, e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, IpcError> {
    serde_json::to_value(value).map_err(|e| IpcError {
        code: "storage_failed",
        message: e.to_string(),
        details: None,
    })
}

pub fn handle_request(db: &mut SchoolDb, req: Request) -> serde_json::Value {
    match dispatch(db, &req.method, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(e) => err(&req.id, e.code, e.message, e.details),
    }
}

fn dispatch(
    db: &mut SchoolDb,
    method: &str,
    params: &serde_json::Value,
) -> Result<serde_json::Value, IpcError> {
    match method {
        "health" => Ok(json!({ "ok": true })),
        "seed.ensure" => {
            db.ensure_seeded()?;
            Ok(json!({ "ok": true }))
        }

        "students.list" => to_json(&db.get_all_students()),
        "students.get" => {
            let id = get_required_str(params, "id")?;
            to_json(&db.get_student(&id)?)
        }
        "students.add" => {
            let draft: StudentDraft = parse_field(params, "student")?;
            to_json(&db.add_student(draft)?)
        }
        "students.update" => {
            let id = get_required_str(params, "id")?;
            let patch: StudentPatch = parse_field(params, "patch")?;
            to_json(&db.update_student(&id, patch)?)
        }
        "students.delete" => {
            let id = get_required_str(params, "id")?;
            to_json(&db.delete_student(&id)?)
        }

        "teachers.list" => to_json(&db.get_all_teachers()),
        "teachers.get" => {
            let id = get_required_str(params, "id")?;
            to_json(&db.get_teacher(&id)?)
        }
        "teachers.add" => {
            let draft: TeacherDraft = parse_field(params, "teacher")?;
            to_json(&db.add_teacher(draft)?)
        }
        "teachers.update" => {
            let id = get_required_str(params, "id")?;
            let patch: TeacherPatch = parse_field(params, "patch")?;
            to_json(&db.update_teacher(&id, patch)?)
        }
        "teachers.delete" => {
            let id = get_required_str(params, "id")?;
            to_json(&db.delete_teacher(&id)?)
        }
        "teachers.bulkAssign" => {
            let teacher_id = get_required_str(params, "teacherId")?;
            let subject = get_required_str(params, "subject")?;
            let student_ids: Vec<String> = parse_field(params, "studentIds")?;
            to_json(&db.bulk_assign_teacher(&teacher_id, &subject, &student_ids)?)
        }

        "attendance.upsertSession" => {
            let teacher_id = get_required_str(params, "teacherId")?;
            let date = get_required_str(params, "date")?;
            let subject = get_required_str(params, "subject")?;
            let status: SessionStatus = parse_field(params, "status")?;
            to_json(&db.upsert_session(&teacher_id, &date, &subject, status)?)
        }
        "attendance.markStudent" => {
            let teacher_id = get_required_str(params, "teacherId")?;
            let date = get_required_str(params, "date")?;
            let student_id = get_required_str(params, "studentId")?;
            let status: MarkStatus = parse_field(params, "status")?;
            to_json(&db.mark_student_attendance(&teacher_id, &date, &student_id, status)?)
        }
        "attendance.markHolidays" => {
            let from = get_required_str(params, "from")?;
            let to = get_required_str(params, "to")?;
            let affected = db.mark_holidays(&from, &to)?;
            Ok(json!({ "affected": affected }))
        }
        "attendance.studentSummary" => {
            let student_id = get_required_str(params, "studentId")?;
            let since = get_required_str(params, "since")?;
            let to = get_required_str(params, "to")?;
            to_json(&db.get_student_attendance_summary(&student_id, &since, &to))
        }
        "attendance.teacherMonth" => {
            let teacher_id = get_required_str(params, "teacherId")?;
            let year = params
                .get("year")
                .and_then(|v| v.as_i64())
                .ok_or_else(|| bad_params("missing year"))? as i32;
            let month = params
                .get("month")
                .and_then(|v| v.as_u64())
                .filter(|m| (1..=12).contains(m))
                .ok_or_else(|| bad_params("month must be between 1 and 12"))?
                as u32;
            to_json(&db.get_attendance_by_teacher_and_month(&teacher_id, year, month))
        }

        "dashboard.kpis" => to_json(&db.get_dashboard_kpis()),

        "progress.student" => {
            let student_id = get_required_str(params, "studentId")?;
            to_json(&db.get_student_progress(&student_id)?)
        }
        "tests.list" => to_json(&db.get_all_tests()),
        "tests.record" => {
            let draft: TestDraft = parse_field(params, "test")?;
            to_json(&db.record_test(draft)?)
        }
        "tests.setMark" => {
            let test_id = get_required_str(params, "testId")?;
            let mark: TestMark = parse_field(params, "mark")?;
            to_json(&db.set_test_mark(&test_id, mark)?)
        }

        "payments.list" => to_json(&db.get_all_payments()),
        "payments.add" => {
            let draft: PaymentDraft = parse_field(params, "payment")?;
            to_json(&db.add_payment(draft)?)
        }
        "payments.updateStatus" => {
            let id = get_required_str(params, "id")?;
            let status: PaymentStatus = parse_field(params, "status")?;
            to_json(&db.update_payment_status(&id, status)?)
        }

        "notices.list" => to_json(&db.get_all_notices()),
        "notices.add" => {
            let draft: NoticeDraft = parse_field(params, "notice")?;
            to_json(&db.add_notice(draft)?)
        }
        "notices.update" => {
            let id = get_required_str(params, "id")?;
            let patch: NoticePatch = parse_field(params, "patch")?;
            to_json(&db.update_notice(&id, patch)?)
        }
        "notices.delete" => {
            let id = get_required_str(params, "id")?;
            to_json(&db.delete_notice(&id)?)
        }
        "notices.visible" => {
            let class = params.get("class").and_then(|v| v.as_str());
            let today = params
                .get("today")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(today_string);
            to_json(&db.get_visible_notices(class, &today))
        }

        "export.studentsCsv" => Ok(json!({ "csv": db.export_students_csv() })),
        "export.testMarksCsv" => Ok(json!({ "csv": db.export_test_marks_csv() })),
        "export.paymentsCsv" => Ok(json!({ "csv": db.export_payments_csv() })),
        "export.noticesCsv" => Ok(json!({ "csv": db.export_notices_csv() })),

        _ => Err(IpcError {
            code: "not_implemented",
            message: format!("unknown method {}", method),
            details: None,
        }),
    }
}
