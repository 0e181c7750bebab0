use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A guardian's commitment to settle a student's tuition by a given date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentPromise {
    pub student_id: String,
    pub student_name: String,
    pub guardian_name: String,
    pub promised_date: NaiveDate,
    pub amount: f64,
    pub created_at: NaiveDate,
}

impl PaymentPromise {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.promised_date < today
    }
}
