//! CSV projections over the persisted collections. Pure string builders;
//! every row reflects the current state of the store and nothing is
//! validated here.

use crate::db::SchoolDb;
use crate::model::PaymentStatus;

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

impl SchoolDb {
    pub fn export_students_csv(&self) -> String {
        let mut csv =
            String::from("id,name,class,rollNumber,contact,guardianName,subjects,assignedTeachers\n");
        for s in self.get_all_students() {
            let teachers = s
                .assigned_teachers
                .iter()
                .map(|r| format!("{} ({})", r.teacher_name, r.subject))
                .collect::<Vec<_>>()
                .join("; ");
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                csv_quote(&s.id),
                csv_quote(&s.name),
                csv_quote(&s.class),
                csv_quote(&s.roll_number),
                csv_quote(&s.contact),
                csv_quote(&s.guardian_name),
                csv_quote(&s.subjects.join("; ")),
                csv_quote(&teachers),
            ));
        }
        csv
    }

    pub fn export_test_marks_csv(&self) -> String {
        let mut csv =
            String::from("testId,class,subject,date,studentId,marks,maxMarks,percentage,grade\n");
        for t in self.get_all_tests() {
            for m in &t.marks {
                let percentage = if t.max_marks > 0.0 {
                    100.0 * m.marks / t.max_marks
                } else {
                    0.0
                };
                csv.push_str(&format!(
                    "{},{},{},{},{},{},{},{:.1},{}\n",
                    csv_quote(&t.id),
                    csv_quote(&t.class),
                    csv_quote(&t.subject),
                    csv_quote(&t.date),
                    csv_quote(&m.student_id),
                    m.marks,
                    t.max_marks,
                    percentage,
                    csv_quote(&m.grade),
                ));
            }
        }
        csv
    }

    pub fn export_payments_csv(&self) -> String {
        let mut csv = String::from("id,studentId,amount,method,status,date,verifiedAt\n");
        for p in self.get_all_payments() {
            let status = match p.status {
                PaymentStatus::PendingVerification => "Pending Verification",
                PaymentStatus::Confirmed => "Confirmed",
            };
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                csv_quote(&p.id),
                csv_quote(&p.student_id),
                p.amount,
                csv_quote(&p.method),
                csv_quote(status),
                csv_quote(&p.date),
                csv_quote(p.verified_at.as_deref().unwrap_or("")),
            ));
        }
        csv
    }

    pub fn export_notices_csv(&self) -> String {
        let mut csv = String::from("id,title,pinned,class,expiryDate,author\n");
        for n in self.get_all_notices() {
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                csv_quote(&n.id),
                csv_quote(&n.title),
                if n.pinned { "1" } else { "0" },
                csv_quote(n.class.as_deref().unwrap_or("")),
                csv_quote(&n.expiry_date),
                csv_quote(&n.author),
            ));
        }
        csv
    }
}
