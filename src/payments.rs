use uuid::Uuid;

use crate::db::SchoolDb;
use crate::error::{DbError, Result};
use crate::model::{now_rfc3339, Payment, PaymentDraft, PaymentStatus};
use crate::store::Collection;

impl SchoolDb {
    pub fn get_all_payments(&self) -> Vec<Payment> {
        self.read_collection(Collection::Payments)
    }

    pub fn get_payments_for_student(&self, student_id: &str) -> Vec<Payment> {
        self.get_all_payments()
            .into_iter()
            .filter(|p| p.student_id == student_id)
            .collect()
    }

    /// New payments start unverified.
    pub fn add_payment(&mut self, draft: PaymentDraft) -> Result<Payment> {
        self.get_student(&draft.student_id)?;
        let mut payments: Vec<Payment> = self.read_collection(Collection::Payments);
        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            student_id: draft.student_id,
            amount: draft.amount,
            method: draft.method,
            status: PaymentStatus::PendingVerification,
            date: draft.date,
            verified_at: None,
        };
        payments.push(payment.clone());
        self.write_collection(Collection::Payments, &payments)?;
        Ok(payment)
    }

    /// `verified_at` is stamped only on the transition into Confirmed.
    pub fn update_payment_status(&mut self, id: &str, status: PaymentStatus) -> Result<Payment> {
        let mut payments: Vec<Payment> = self.read_collection(Collection::Payments);
        let p = payments
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DbError::NotFound {
                entity: "payment",
                id: id.to_string(),
            })?;
        if status == PaymentStatus::Confirmed && p.status != PaymentStatus::Confirmed {
            p.verified_at = Some(now_rfc3339());
        }
        p.status = status;
        let updated = p.clone();
        self.write_collection(Collection::Payments, &payments)?;
        Ok(updated)
    }
}
