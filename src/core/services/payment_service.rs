//! Monthly tuition history generation and status derivation.

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use uuid::Builder;

use crate::domain::{MonthRef, PaymentRecord, PaymentRecordStatus, PaymentStatus, Student};

/// Number of most recent months kept in a student's history.
pub const HISTORY_RETENTION: usize = 12;
/// Chance that a generated month is paid.
pub const PAY_PROBABILITY: f64 = 0.85;

pub struct PaymentService;

impl PaymentService {
    /// Builds one record per calendar month from the enrollment month through
    /// the month of `today`, keeping only the last [`HISTORY_RETENTION`].
    pub fn generate_history<R: Rng + ?Sized>(
        rng: &mut R,
        enrollment: NaiveDate,
        today: NaiveDate,
        monthly_fee: f64,
    ) -> Vec<PaymentRecord> {
        let last = MonthRef::from_date(today);
        let mut cursor = Some(MonthRef::from_date(enrollment));
        let mut history = Vec::new();

        while let Some(month) = cursor.filter(|month| *month <= last) {
            let paid = rng.gen_bool(PAY_PROBABILITY);
            let status = if paid {
                PaymentRecordStatus::Pago
            } else if rng.gen_bool(0.5) {
                PaymentRecordStatus::Pendente
            } else {
                PaymentRecordStatus::Atrasado
            };
            history.push(PaymentRecord {
                id: Builder::from_random_bytes(rng.gen()).into_uuid(),
                date: paid.then(|| month.day_clamped(enrollment.day())),
                amount: monthly_fee,
                status,
                reference: month,
            });
            cursor = month.next();
        }

        let excess = history.len().saturating_sub(HISTORY_RETENTION);
        history.drain(..excess);
        history
    }

    /// Status of the most recent history entry, or `None` for an empty history.
    pub fn derive_status(history: &[PaymentRecord]) -> Option<PaymentStatus> {
        history.last().map(|record| record.status.into())
    }

    /// Convenience wrapper over [`PaymentService::derive_status`].
    pub fn current_status(student: &Student) -> Option<PaymentStatus> {
        Self::derive_status(&student.payment_history)
    }

    /// Whether the student counts as owing tuition on the dashboard.
    pub fn is_behind(student: &Student) -> bool {
        matches!(
            Self::current_status(student),
            Some(PaymentStatus::Pendente | PaymentStatus::Atrasado)
        )
    }

    /// Billing status for a specific month; a month with no record is pending.
    pub fn status_for_month(student: &Student, month: MonthRef) -> PaymentRecordStatus {
        student
            .payment_for(month)
            .map(|record| record.status)
            .unwrap_or(PaymentRecordStatus::Pendente)
    }

    /// Amount received for `month`, zero unless the record is paid.
    pub fn received_in_month(student: &Student, month: MonthRef) -> f64 {
        student
            .payment_for(month)
            .filter(|record| record.is_paid())
            .map(|record| record.amount)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use uuid::Uuid;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(month: MonthRef, status: PaymentRecordStatus) -> PaymentRecord {
        PaymentRecord {
            id: Uuid::new_v4(),
            date: None,
            amount: 100.0,
            status,
            reference: month,
        }
    }

    #[test]
    fn history_covers_enrollment_through_current_month() {
        let mut rng = StdRng::seed_from_u64(7);
        let history =
            PaymentService::generate_history(&mut rng, ymd(2024, 1, 31), ymd(2024, 4, 10), 150.0);
        let refs: Vec<String> = history.iter().map(|r| r.reference.to_string()).collect();
        assert_eq!(refs, ["01/2024", "02/2024", "03/2024", "04/2024"]);
        for record in &history {
            assert_eq!(record.amount, 150.0);
            assert_eq!(record.date.is_some(), record.is_paid());
        }
    }

    #[test]
    fn history_keeps_only_last_twelve_months() {
        let mut rng = StdRng::seed_from_u64(11);
        let history =
            PaymentService::generate_history(&mut rng, ymd(2021, 6, 15), ymd(2024, 6, 15), 70.0);
        assert_eq!(history.len(), HISTORY_RETENTION);
        assert_eq!(history.first().unwrap().reference.to_string(), "07/2023");
        assert_eq!(history.last().unwrap().reference.to_string(), "06/2024");
        assert!(history
            .windows(2)
            .all(|pair| pair[0].reference < pair[1].reference));
    }

    #[test]
    fn status_follows_last_entry() {
        let jan = MonthRef::new(2024, 1).unwrap();
        let feb = MonthRef::new(2024, 2).unwrap();
        let history = vec![
            record(jan, PaymentRecordStatus::Atrasado),
            record(feb, PaymentRecordStatus::Pago),
        ];
        assert_eq!(
            PaymentService::derive_status(&history),
            Some(PaymentStatus::EmDia)
        );
        assert_eq!(PaymentService::derive_status(&[]), None);
    }
}
