//! Twelve-month tuition and costume breakdown for a guardian.

use serde::Serialize;

use crate::domain::{Guardian, MonthRef, Student};

const SETTLED_EPSILON: f64 = 1e-9;

/// Obligations of every student of a guardian for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyDebt {
    pub month: MonthRef,
    pub label: String,
    pub tuition: f64,
    pub tuition_paid: bool,
    pub costume: f64,
    pub costume_paid: bool,
    pub other: f64,
    pub other_paid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub total: f64,
    pub paid: f64,
    pub pending: f64,
}

impl CategoryTotals {
    fn from_months(months: impl Iterator<Item = (f64, bool)> + Clone) -> Self {
        let total: f64 = months.clone().map(|(amount, _)| amount).sum();
        let paid: f64 = months
            .filter(|(_, paid)| *paid)
            .map(|(amount, _)| amount)
            .sum();
        Self {
            total,
            paid,
            pending: total - paid,
        }
    }

    /// "Quitado": nothing left to pay in this category.
    pub fn is_settled(&self) -> bool {
        self.pending <= SETTLED_EPSILON
    }

    pub fn paid_percentage(&self) -> f64 {
        DebtService::paid_percentage(self.paid, self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DebtCategoryKind {
    Tuition,
    Costume,
}

impl DebtCategoryKind {
    pub fn label(&self) -> &'static str {
        match self {
            DebtCategoryKind::Tuition => "Mensalidades",
            DebtCategoryKind::Costume => "Figurino",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebtMonthLine {
    pub month: MonthRef,
    pub label: String,
    pub amount: f64,
    pub paid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebtCategory {
    pub kind: DebtCategoryKind,
    pub totals: CategoryTotals,
    pub months: Vec<DebtMonthLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebtConsultation {
    pub guardian_id: String,
    pub year: i32,
    pub months: Vec<MonthlyDebt>,
    pub tuition: CategoryTotals,
    pub costume: CategoryTotals,
    pub grand_total: f64,
    pub grand_paid: f64,
    pub grand_pending: f64,
}

impl DebtConsultation {
    /// Per-category view. Costume lines only list months that bill something.
    pub fn categories(&self) -> Vec<DebtCategory> {
        let tuition_months = self
            .months
            .iter()
            .map(|m| DebtMonthLine {
                month: m.month,
                label: m.label.clone(),
                amount: m.tuition,
                paid: m.tuition_paid,
            })
            .collect();
        let costume_months = self
            .months
            .iter()
            .filter(|m| m.costume > 0.0)
            .map(|m| DebtMonthLine {
                month: m.month,
                label: m.label.clone(),
                amount: m.costume,
                paid: m.costume_paid,
            })
            .collect();

        vec![
            DebtCategory {
                kind: DebtCategoryKind::Tuition,
                totals: self.tuition,
                months: tuition_months,
            },
            DebtCategory {
                kind: DebtCategoryKind::Costume,
                totals: self.costume,
                months: costume_months,
            },
        ]
    }
}

pub struct DebtService;

impl DebtService {
    /// Builds the January..December breakdown of `year` for `students`.
    pub fn consult(guardian: &Guardian, students: &[&Student], year: i32) -> DebtConsultation {
        let months: Vec<MonthlyDebt> = (0u32..12)
            .filter_map(|index| MonthRef::new(year, index + 1).map(|month| (index, month)))
            .map(|(index, month)| Self::month_debt(students, index, month))
            .collect();

        let tuition = CategoryTotals::from_months(months.iter().map(|m| (m.tuition, m.tuition_paid)));
        let costume = CategoryTotals::from_months(months.iter().map(|m| (m.costume, m.costume_paid)));

        DebtConsultation {
            guardian_id: guardian.id.clone(),
            year,
            grand_total: tuition.total + costume.total,
            grand_paid: tuition.paid + costume.paid,
            grand_pending: tuition.pending + costume.pending,
            months,
            tuition,
            costume,
        }
    }

    /// Share of `total` already paid, capped at 100. An empty total yields 0.
    pub fn paid_percentage(paid: f64, total: f64) -> f64 {
        if total == 0.0 || !total.is_finite() {
            return 0.0;
        }
        let ratio = paid / total * 100.0;
        if ratio.is_nan() {
            0.0
        } else {
            ratio.min(100.0)
        }
    }

    fn month_debt(students: &[&Student], index: u32, month: MonthRef) -> MonthlyDebt {
        let mut tuition = 0.0;
        let mut tuition_paid = true;
        let mut costume_total = 0.0;
        let mut costume_paid = true;

        for student in students {
            tuition += student.monthly_fee;
            if !student.payment_for(month).is_some_and(|record| record.is_paid()) {
                tuition_paid = false;
            }

            if let Some(costume) = student.purchased_costume() {
                if costume.bills_month(index) {
                    costume_total += costume.per_month();
                    if !costume.is_paid_through(index) {
                        costume_paid = false;
                    }
                }
            }
        }

        MonthlyDebt {
            month,
            label: month.long_label(),
            tuition,
            tuition_paid,
            costume: costume_total,
            costume_paid,
            other: 0.0,
            other_paid: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        BalletLevel, Costume, NewGuardian, PaymentRecord, PaymentRecordStatus, StudentStatus,
    };
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn guardian() -> Guardian {
        Guardian::from_new("grd-1", NewGuardian::default())
    }

    fn student(fee: f64, costume: Option<Costume>) -> Student {
        Student {
            id: "std-1".into(),
            name: "Ana Silva".into(),
            birth_date: NaiveDate::from_ymd_opt(2015, 4, 2).unwrap(),
            age: 9,
            phone: String::new(),
            email: String::new(),
            level: BalletLevel::Iniciante,
            class: "Iniciante I".into(),
            branch_id: "centro".into(),
            enrollment_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            status: StudentStatus::Ativo,
            monthly_fee: fee,
            guardian_id: "grd-1".into(),
            payment_history: Vec::new(),
            scholarship: None,
            costume,
        }
    }

    fn paid(month: u32) -> PaymentRecord {
        PaymentRecord {
            id: Uuid::new_v4(),
            date: None,
            amount: 100.0,
            status: PaymentRecordStatus::Pago,
            reference: MonthRef::new(2024, month).unwrap(),
        }
    }

    #[test]
    fn tuition_paid_requires_every_student() {
        let mut first = student(100.0, None);
        first.payment_history = vec![paid(1), paid(2)];
        let mut second = student(150.0, None);
        second.payment_history = vec![paid(1)];

        let report = DebtService::consult(&guardian(), &[&first, &second], 2024);
        assert_eq!(report.months.len(), 12);
        assert_eq!(report.months[0].tuition, 250.0);
        assert!(report.months[0].tuition_paid);
        assert!(!report.months[1].tuition_paid);
        assert_eq!(report.tuition.total, 3000.0);
        assert_eq!(report.tuition.paid, 250.0);
        assert_eq!(report.tuition.pending, 2750.0);
        assert_eq!(report.months[0].label, "Janeiro");
    }

    #[test]
    fn costume_installments_use_cumulative_threshold() {
        let costume = Costume {
            purchased: true,
            total_amount: 300.0,
            installments: 3,
            paid_amount: 200.0,
        };
        let pupil = student(100.0, Some(costume));
        let report = DebtService::consult(&guardian(), &[&pupil], 2024);

        assert_eq!(report.months[1].costume, 100.0);
        assert!(report.months[0].costume_paid);
        assert!(report.months[1].costume_paid);
        assert!(!report.months[2].costume_paid);
        assert_eq!(report.months[3].costume, 0.0);
        assert!(report.months[3].costume_paid);
        assert_eq!(report.costume.total, 300.0);
        assert_eq!(report.costume.paid, 200.0);
        assert!(!report.costume.is_settled());

        let categories = report.categories();
        assert_eq!(categories[1].kind, DebtCategoryKind::Costume);
        assert_eq!(categories[1].months.len(), 3);
    }

    #[test]
    fn unpurchased_costume_is_ignored() {
        let costume = Costume {
            purchased: false,
            total_amount: 300.0,
            installments: 3,
            paid_amount: 0.0,
        };
        let pupil = student(100.0, Some(costume));
        let report = DebtService::consult(&guardian(), &[&pupil], 2024);
        assert_eq!(report.costume.total, 0.0);
        assert!(report.costume.is_settled());
        assert_eq!(report.costume.paid_percentage(), 0.0);
    }

    #[test]
    fn paid_percentage_guards_zero_total() {
        assert_eq!(DebtService::paid_percentage(0.0, 0.0), 0.0);
        assert_eq!(DebtService::paid_percentage(50.0, 200.0), 25.0);
        assert_eq!(DebtService::paid_percentage(300.0, 200.0), 100.0);
    }

    #[test]
    fn guardian_without_students_is_settled() {
        let report = DebtService::consult(&guardian(), &[], 2024);
        assert_eq!(report.grand_total, 0.0);
        assert!(report.tuition.is_settled());
        assert_eq!(report.tuition.paid_percentage(), 0.0);
    }
}
