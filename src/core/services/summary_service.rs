//! Folds students and transactions into the figures shown on the dashboard
//! and finance pages.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::services::PaymentService;
use crate::domain::{MonthRef, Student, Transaction, TransactionCategory, TransactionKind};

/// Months shown by the revenue chart, current month included.
pub const REVENUE_WINDOW_MONTHS: usize = 6;
/// Buckets shown by a category chart; the remainder is dropped.
pub const CATEGORY_CHART_LIMIT: usize = 6;
/// Label for transactions whose category is not in the catalog.
pub const UNKNOWN_CATEGORY_LABEL: &str = "Outros";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyFlow {
    pub month: MonthRef,
    pub label: String,
    pub receitas: f64,
    pub despesas: f64,
    pub saldo: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBucket {
    pub category_id: String,
    pub name: String,
    pub value: f64,
    /// Percentage of the charted total (0 when nothing is charted).
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub active_students: usize,
    pub pending_payments: usize,
    pub current_revenue: f64,
    pub current_expenses: f64,
    pub last_revenue: f64,
    pub last_expenses: f64,
    pub revenue_change: f64,
    pub expense_change: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceSummary {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub total_balance: f64,
    pub current_revenue: f64,
    pub current_expenses: f64,
    pub month_balance: f64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub class_name: String,
    pub student_count: usize,
    pub total_expected: f64,
    pub total_received: f64,
    pub student_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Flow {
    revenue: f64,
    expenses: f64,
}

impl Flow {
    fn add(&mut self, transaction: &Transaction) {
        match transaction.kind {
            TransactionKind::Receita => self.revenue += transaction.amount,
            TransactionKind::Despesa => self.expenses += transaction.amount,
        }
    }
}

pub struct SummaryService;

impl SummaryService {
    /// Revenue against expenses for the six calendar months ending with the
    /// month of `today`. Always returns six points, oldest first.
    pub fn revenue_series<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
        today: NaiveDate,
    ) -> Vec<MonthlyFlow> {
        let current = MonthRef::from_date(today);
        let months: Vec<MonthRef> = (0..REVENUE_WINDOW_MONTHS as i32)
            .rev()
            .filter_map(|back| current.shift(-back))
            .collect();
        let mut flows = vec![Flow::default(); months.len()];

        for transaction in transactions {
            let month = MonthRef::from_date(transaction.date);
            if let Some(slot) = months.iter().position(|candidate| *candidate == month) {
                flows[slot].add(transaction);
            }
        }

        months
            .into_iter()
            .zip(flows)
            .map(|(month, flow)| MonthlyFlow {
                month,
                label: month.short_label(),
                receitas: flow.revenue,
                despesas: flow.expenses,
                saldo: flow.revenue - flow.expenses,
            })
            .collect()
    }

    /// Totals per category for one transaction kind, largest first, truncated
    /// to [`CATEGORY_CHART_LIMIT`] buckets.
    pub fn category_totals<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
        categories: &[TransactionCategory],
        kind: TransactionKind,
    ) -> Vec<CategoryBucket> {
        let mut totals: HashMap<&str, f64> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();
        for transaction in transactions.into_iter().filter(|t| t.kind == kind) {
            let key = transaction.category_id.as_str();
            let entry = totals.entry(key).or_insert_with(|| {
                first_seen.push(key);
                0.0
            });
            *entry += transaction.amount;
        }

        let mut buckets: Vec<CategoryBucket> = first_seen
            .into_iter()
            .map(|id| CategoryBucket {
                category_id: id.to_string(),
                name: categories
                    .iter()
                    .find(|category| category.id == id)
                    .map(|category| category.name.clone())
                    .unwrap_or_else(|| UNKNOWN_CATEGORY_LABEL.to_string()),
                value: totals.get(id).copied().unwrap_or_default(),
                share: 0.0,
            })
            .collect();
        buckets.sort_by(|a, b| b.value.total_cmp(&a.value));
        buckets.truncate(CATEGORY_CHART_LIMIT);

        let charted: f64 = buckets.iter().map(|bucket| bucket.value).sum();
        for bucket in &mut buckets {
            bucket.share = if charted > 0.0 {
                bucket.value / charted * 100.0
            } else {
                0.0
            };
        }
        buckets
    }

    pub fn dashboard_stats<'s, 't>(
        students: impl IntoIterator<Item = &'s Student>,
        transactions: impl IntoIterator<Item = &'t Transaction>,
        today: NaiveDate,
    ) -> DashboardStats {
        let current_month = MonthRef::from_date(today);
        let last_month = current_month.shift(-1);
        let mut current = Flow::default();
        let mut last = Flow::default();
        for transaction in transactions {
            let month = MonthRef::from_date(transaction.date);
            if month == current_month {
                current.add(transaction);
            } else if Some(month) == last_month {
                last.add(transaction);
            }
        }

        let mut active_students = 0;
        let mut pending_payments = 0;
        for student in students {
            if student.is_active() {
                active_students += 1;
            }
            if PaymentService::is_behind(student) {
                pending_payments += 1;
            }
        }

        DashboardStats {
            active_students,
            pending_payments,
            current_revenue: current.revenue,
            current_expenses: current.expenses,
            last_revenue: last.revenue,
            last_expenses: last.expenses,
            revenue_change: percent_change(current.revenue, last.revenue),
            expense_change: percent_change(current.expenses, last.expenses),
            balance: current.revenue - current.expenses,
        }
    }

    pub fn finance_summary<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
        today: NaiveDate,
    ) -> FinanceSummary {
        let current_month = MonthRef::from_date(today);
        let mut all = Flow::default();
        let mut current = Flow::default();
        let mut count = 0;
        for transaction in transactions {
            count += 1;
            all.add(transaction);
            if current_month.contains(transaction.date) {
                current.add(transaction);
            }
        }

        FinanceSummary {
            total_revenue: all.revenue,
            total_expenses: all.expenses,
            total_balance: all.revenue - all.expenses,
            current_revenue: current.revenue,
            current_expenses: current.expenses,
            month_balance: current.revenue - current.expenses,
            transaction_count: count,
        }
    }

    /// Per-class tuition expected and received this month, active students only.
    pub fn class_summaries<'a>(
        students: impl IntoIterator<Item = &'a Student>,
        today: NaiveDate,
    ) -> Vec<ClassSummary> {
        let month = MonthRef::from_date(today);
        let mut summaries: BTreeMap<&str, ClassSummary> = BTreeMap::new();
        for student in students.into_iter().filter(|s| s.is_active()) {
            let summary = summaries
                .entry(student.class.as_str())
                .or_insert_with(|| ClassSummary {
                    class_name: student.class.clone(),
                    student_count: 0,
                    total_expected: 0.0,
                    total_received: 0.0,
                    student_ids: Vec::new(),
                });
            summary.student_count += 1;
            summary.total_expected += student.monthly_fee;
            summary.total_received += PaymentService::received_in_month(student, month);
            summary.student_ids.push(student.id.clone());
        }
        summaries.into_values().collect()
    }
}

/// Month-over-month change in percent, one decimal; 0 without a baseline.
fn percent_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        ((current - previous) / previous * 1000.0).round() / 10.0
    } else {
        0.0
    }
}
