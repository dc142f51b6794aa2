use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::model::SessionStatus;

/// A student still referencing a teacher whose deletion was requested.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockingStudent {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("class {class} already has a student with roll number {roll_number}")]
    DuplicateRollNumber { class: String, roll_number: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("teacher {teacher_id} still has {} assigned student(s)", .blocking.len())]
    HasDependents {
        teacher_id: String,
        blocking: Vec<BlockingStudent>,
    },

    #[error("teacher {0} is not approved for assignments")]
    TeacherNotApproved(String),

    #[error("session {session_id} is {status}; marks require a held session")]
    InvalidSessionState {
        session_id: String,
        status: SessionStatus,
    },

    #[error("invalid availability: {0}")]
    InvalidAvailability(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = DbError> = std::result::Result<T, E>;

impl DbError {
    /// Stable code string used in IPC error responses.
    pub fn code(&self) -> &'static str {
        match self {
            DbError::DuplicateRollNumber { .. } => "duplicate_roll_number",
            DbError::NotFound { .. } => "not_found",
            DbError::HasDependents { .. } => "has_dependents",
            DbError::TeacherNotApproved(_) => "teacher_not_approved",
            DbError::InvalidSessionState { .. } => "invalid_session_state",
            DbError::InvalidAvailability(_) => "invalid_availability",
            DbError::Storage(_) | DbError::Io(_) | DbError::Serialization(_) => "storage_failed",
        }
    }

    /// Structured evidence for the caller, where the condition carries any.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            DbError::DuplicateRollNumber { class, roll_number } => Some(json!({
                "class": class,
                "rollNumber": roll_number,
            })),
            DbError::HasDependents { blocking, .. } => Some(json!({
                "blockingStudents": blocking,
            })),
            _ => None,
        }
    }
}
