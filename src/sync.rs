//! The single code path for student↔teacher cross-reference writes. No
//! other module mutates `Teacher::assigned_student_ids` directly, apart
//! from the bulk-assignment fast path which applies the same membership
//! rules to both collections in one pass.

use std::collections::{HashMap, HashSet};

use tracing::error;

use crate::db::SchoolDb;
use crate::error::Result;
use crate::model::{Student, Teacher};
use crate::store::Collection;

impl SchoolDb {
    /// Bring every teacher record into agreement with a student's new
    /// teacher set. Old and new sets are compared as sets; a pure reordering
    /// of a student's assignments never mutates a teacher. The collection is
    /// written back only when at least one teacher actually changed.
    pub(crate) fn sync_assignments(
        &mut self,
        student_id: &str,
        old_ids: &HashSet<String>,
        new_ids: &HashSet<String>,
    ) -> Result<()> {
        if old_ids == new_ids {
            return Ok(());
        }
        let mut teachers: Vec<Teacher> = self.read_collection(Collection::Teachers);
        let mut changed = false;
        for t in &mut teachers {
            let had = old_ids.contains(&t.id);
            let should_have = new_ids.contains(&t.id);
            if should_have && !had {
                // Skip-if-present defends against double invocation.
                if !t.assigned_student_ids.iter().any(|id| id == student_id) {
                    t.assigned_student_ids.push(student_id.to_string());
                    changed = true;
                }
            } else if had && !should_have {
                if let Some(pos) = t.assigned_student_ids.iter().position(|id| id == student_id) {
                    t.assigned_student_ids.remove(pos);
                    changed = true;
                }
            }
        }
        if changed {
            self.write_collection(Collection::Teachers, &teachers)?;
        }
        Ok(())
    }

    /// Recompute every teacher's student set from the student collection
    /// (students authoritative). Any divergence is an internal-consistency
    /// error: it is logged loudly, then repaired. Returns the number of
    /// teachers repaired.
    pub fn reconcile_assignments(&mut self) -> Result<usize> {
        let students: Vec<Student> = self.read_collection(Collection::Students);
        let mut teachers: Vec<Teacher> = self.read_collection(Collection::Teachers);

        let mut expected: HashMap<&str, Vec<String>> = HashMap::new();
        for s in &students {
            for tid in &s.assigned_teacher_ids {
                let ids = expected.entry(tid.as_str()).or_default();
                if !ids.iter().any(|id| id == &s.id) {
                    ids.push(s.id.clone());
                }
            }
        }

        let mut repaired = 0usize;
        for t in &mut teachers {
            let want = expected.remove(t.id.as_str()).unwrap_or_default();
            let have: HashSet<&String> = t.assigned_student_ids.iter().collect();
            let want_set: HashSet<&String> = want.iter().collect();
            if have != want_set {
                error!(
                    teacher = %t.id,
                    stored = t.assigned_student_ids.len(),
                    expected = want.len(),
                    "assignment cross-reference mismatch; repairing from student records"
                );
                t.assigned_student_ids = want;
                repaired += 1;
            }
        }
        if repaired > 0 {
            self.write_collection(Collection::Teachers, &teachers)?;
        }
        Ok(repaired)
    }
}
