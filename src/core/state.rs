//! Immutable application snapshot.
//!
//! Reducers never touch `self`; each successful call returns a new snapshot
//! and a rejected call leaves the caller holding the old one untouched.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::services::{
    debt_service::DebtConsultation,
    guardian_service::GuardianService,
    student_service::{StudentFilter, StudentService},
    summary_service::{
        CategoryBucket, ClassSummary, DashboardStats, FinanceSummary, MonthlyFlow, SummaryService,
    },
    transaction_service::{TransactionFilter, TransactionService},
    DebtService, ServiceError, ServiceResult, WalletService,
};
use crate::currency::format_brl;
use crate::domain::{
    find_by_id, Branch, BranchFilter, EntryCategory, Guardian, NewGuardian, NewStudent,
    NewTransaction, Notification, PaymentPromise, Student, Transaction, TransactionCategory,
    TransactionKind, TUITION_CATEGORY_ID,
};
use crate::seed::{self, SeedData};

/// Days ahead a promise defaults to when no date is given.
pub const DEFAULT_PROMISE_DAYS: u64 = 7;

/// Result of a reducer: the next snapshot plus whatever the call produced.
pub type Transition<T> = ServiceResult<(AppState, T)>;

#[derive(Debug, Clone, Serialize)]
pub struct AppState {
    today: NaiveDate,
    branches: Vec<Branch>,
    categories: Vec<TransactionCategory>,
    guardians: Vec<Guardian>,
    students: Vec<Student>,
    transactions: Vec<Transaction>,
    promises: Vec<PaymentPromise>,
    notifications: Vec<Notification>,
    selected_branch: BranchFilter,
    sidebar_open: bool,
    next_student_seq: u64,
    next_guardian_seq: u64,
}

impl AppState {
    /// Builds the seeded school as of `today`.
    pub fn generate(seed: u64, today: NaiveDate) -> ServiceResult<Self> {
        Ok(Self::from_seed(seed::generate(seed, today)?, today))
    }

    /// Branches and categories only; no people and no cash flow.
    pub fn empty(today: NaiveDate) -> Self {
        Self::from_seed(
            SeedData {
                branches: seed::branches(),
                categories: TransactionCategory::catalog(),
                guardians: Vec::new(),
                students: Vec::new(),
                transactions: Vec::new(),
            },
            today,
        )
    }

    pub fn from_seed(data: SeedData, today: NaiveDate) -> Self {
        let next_student_seq = next_sequence(data.students.iter().map(|s| s.id.as_str()), "std-");
        let next_guardian_seq =
            next_sequence(data.guardians.iter().map(|g| g.id.as_str()), "grd-");
        Self {
            today,
            branches: data.branches,
            categories: data.categories,
            guardians: data.guardians,
            students: data.students,
            transactions: data.transactions,
            promises: Vec::new(),
            notifications: seed::notifications(),
            selected_branch: BranchFilter::All,
            sidebar_open: true,
            next_student_seq,
            next_guardian_seq,
        }
    }

    // --- reducers -------------------------------------------------------

    pub fn select_branch(&self, filter: BranchFilter) -> ServiceResult<Self> {
        if let BranchFilter::Only(id) = &filter {
            if self.branch(id).is_none() {
                return rejected("select_branch", ServiceError::BranchNotFound(id.clone()));
            }
        }
        debug!(branch = %filter, "Branch selected");
        let mut next = self.clone();
        next.selected_branch = filter;
        Ok(next)
    }

    pub fn set_sidebar_open(&self, open: bool) -> Self {
        let mut next = self.clone();
        next.sidebar_open = open;
        next
    }

    pub fn toggle_sidebar(&self) -> Self {
        self.set_sidebar_open(!self.sidebar_open)
    }

    /// Registers a guardian with an empty wallet and returns its id.
    pub fn add_guardian(&self, data: NewGuardian) -> Transition<String> {
        let data = match GuardianService::validate(data) {
            Ok(data) => data,
            Err(err) => return rejected("add_guardian", err),
        };
        let mut next = self.clone();
        let id = format!("grd-{}", next.next_guardian_seq);
        next.next_guardian_seq += 1;
        next.guardians.insert(0, Guardian::from_new(id.clone(), data));
        info!(guardian = %id, "Guardian added");
        Ok((next, id))
    }

    /// Enrolls a student under an existing guardian and bills the guardian
    /// for the yearly contract (fee × 10) plus any purchased costume.
    pub fn add_student(&self, data: NewStudent) -> Transition<String> {
        match self.try_add_student(data) {
            Ok(done) => Ok(done),
            Err(err) => rejected("add_student", err),
        }
    }

    fn try_add_student(&self, data: NewStudent) -> Transition<String> {
        let data = StudentService::validate(data, &self.branches)?;
        let guardian_index = self
            .guardians
            .iter()
            .position(|guardian| guardian.id == data.guardian_id)
            .ok_or_else(|| ServiceError::GuardianNotFound(data.guardian_id.clone()))?;

        let mut next = self.clone();
        let id = format!("std-{}", next.next_student_seq);
        next.next_student_seq += 1;
        let student = StudentService::enroll(id.clone(), data, self.today);

        let guardian = &mut next.guardians[guardian_index];
        guardian.student_ids.push(id.clone());
        WalletService::apply_debit(
            &mut guardian.wallet,
            student.monthly_fee * 10.0,
            EntryCategory::Tuition,
            format!("Contrato Anual - {}", student.name),
            self.today,
        )?;
        if let Some(costume) = student.purchased_costume() {
            WalletService::apply_debit(
                &mut guardian.wallet,
                costume.total_amount,
                EntryCategory::Costume,
                format!("Figurino - {}", student.name),
                self.today,
            )?;
        }
        info!(
            student = %id,
            guardian = %guardian.id,
            balance = %format_brl(guardian.wallet.balance),
            "Student enrolled"
        );

        next.students.insert(0, student);
        Ok((next, id))
    }

    pub fn add_transaction(&self, data: NewTransaction) -> Transition<Uuid> {
        let data = match TransactionService::validate(data, &self.branches, &self.categories) {
            Ok(data) => data,
            Err(err) => return rejected("add_transaction", err),
        };
        let mut next = self.clone();
        let (kind, amount, branch) = (data.kind, data.amount, data.branch_id.clone());
        let id = TransactionService::insert(&mut next.transactions, data);
        info!(
            transaction = %id,
            %kind,
            amount = %format_brl(amount),
            %branch,
            "Transaction recorded"
        );
        Ok((next, id))
    }

    /// Books a tuition payment as revenue for the student's branch and
    /// drops any open promise for that student.
    pub fn register_tuition_payment(&self, student_id: &str, amount: f64) -> Transition<Uuid> {
        let Some(student) = self.student(student_id) else {
            return rejected(
                "register_tuition_payment",
                ServiceError::StudentNotFound(student_id.to_string()),
            );
        };
        let payment = NewTransaction {
            date: self.today,
            description: format!("Mensalidade - {}", student.name),
            amount,
            kind: TransactionKind::Receita,
            category_id: TUITION_CATEGORY_ID.to_string(),
            branch_id: student.branch_id.clone(),
            student_id: Some(student.id.clone()),
            guardian_id: Some(student.guardian_id.clone()),
        };
        let payment =
            match TransactionService::validate_posting(payment, &self.branches, &self.categories) {
                Ok(payment) => payment,
                Err(err) => return rejected("register_tuition_payment", err),
            };
        let mut next = self.clone();
        let amount = payment.amount;
        let id = TransactionService::insert(&mut next.transactions, payment);
        next.promises.retain(|promise| promise.student_id != student_id);
        info!(
            transaction = %id,
            student = %student_id,
            amount = %format_brl(amount),
            "Tuition payment recorded"
        );
        Ok((next, id))
    }

    /// Records (or replaces) the promise for a student. Without a date the
    /// promise falls due a week from today.
    pub fn promise_payment(
        &self,
        student_id: &str,
        promised_date: Option<NaiveDate>,
    ) -> Transition<PaymentPromise> {
        let Some(student) = self.student(student_id) else {
            return rejected(
                "promise_payment",
                ServiceError::StudentNotFound(student_id.to_string()),
            );
        };
        let promised_date = match promised_date {
            Some(date) => date,
            None => self
                .today
                .checked_add_days(Days::new(DEFAULT_PROMISE_DAYS))
                .unwrap_or(self.today),
        };
        let promise = PaymentPromise {
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            guardian_name: self
                .guardian(&student.guardian_id)
                .map(|guardian| guardian.name.clone())
                .unwrap_or_else(|| "Responsável".to_string()),
            promised_date,
            amount: student.monthly_fee,
            created_at: self.today,
        };

        let mut next = self.clone();
        next.promises.retain(|existing| existing.student_id != student_id);
        next.promises.push(promise.clone());
        info!(student = %student_id, due = %promised_date, "Payment promise recorded");
        Ok((next, promise))
    }

    /// Marks the whole feed as read. Returns how many were unread.
    pub fn mark_notifications_read(&self) -> (Self, usize) {
        let unread = self.unread_notifications();
        let mut next = self.clone();
        for item in &mut next.notifications {
            item.read = true;
        }
        debug!(unread, "Notifications marked as read");
        (next, unread)
    }

    /// Drops the student's promise. Returns the snapshot and whether one existed.
    pub fn remove_promise(&self, student_id: &str) -> (Self, bool) {
        let mut next = self.clone();
        let before = next.promises.len();
        next.promises.retain(|promise| promise.student_id != student_id);
        let removed = next.promises.len() != before;
        debug!(student = %student_id, removed, "Payment promise removed");
        (next, removed)
    }

    /// Moves the snapshot's notion of "today", e.g. after midnight in a long session.
    pub fn with_today(&self, today: NaiveDate) -> Self {
        let mut next = self.clone();
        next.today = today;
        next
    }

    // --- getters --------------------------------------------------------

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn branch(&self, id: &str) -> Option<&Branch> {
        find_by_id(&self.branches, id)
    }

    pub fn categories(&self) -> &[TransactionCategory] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&TransactionCategory> {
        find_by_id(&self.categories, id)
    }

    pub fn guardians(&self) -> &[Guardian] {
        &self.guardians
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn promises(&self) -> &[PaymentPromise] {
        &self.promises
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_notifications(&self) -> usize {
        self.notifications.iter().filter(|item| !item.read).count()
    }

    pub fn promise_for(&self, student_id: &str) -> Option<&PaymentPromise> {
        self.promises
            .iter()
            .find(|promise| promise.student_id == student_id)
    }

    pub fn selected_branch(&self) -> &BranchFilter {
        &self.selected_branch
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    /// Students of the selected branch.
    pub fn filtered_students(&self) -> Vec<&Student> {
        self.students
            .iter()
            .filter(|student| self.selected_branch.matches(&student.branch_id))
            .collect()
    }

    /// Transactions of the selected branch, newest first.
    pub fn filtered_transactions(&self) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|transaction| self.selected_branch.matches(&transaction.branch_id))
            .collect()
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        find_by_id(&self.students, id)
    }

    pub fn guardian(&self, id: &str) -> Option<&Guardian> {
        find_by_id(&self.guardians, id)
    }

    pub fn guardian_for_student(&self, student_id: &str) -> Option<&Guardian> {
        self.student(student_id)
            .and_then(|student| self.guardian(&student.guardian_id))
    }

    pub fn students_of_guardian(&self, guardian_id: &str) -> Vec<&Student> {
        self.students
            .iter()
            .filter(|student| student.guardian_id == guardian_id)
            .collect()
    }

    // --- views ----------------------------------------------------------

    pub fn search_students(&self, filter: &StudentFilter) -> Vec<&Student> {
        StudentService::filter(self.filtered_students(), &self.guardians, filter)
    }

    pub fn search_guardians(&self, query: &str) -> Vec<&Guardian> {
        GuardianService::search(&self.guardians, query)
    }

    pub fn search_transactions(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        TransactionService::filter(self.filtered_transactions(), filter)
    }

    pub fn recent_transactions(&self, count: usize) -> Vec<&Transaction> {
        TransactionService::recent(self.filtered_transactions(), count)
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        SummaryService::dashboard_stats(
            self.filtered_students(),
            self.filtered_transactions(),
            self.today,
        )
    }

    pub fn revenue_series(&self) -> Vec<MonthlyFlow> {
        SummaryService::revenue_series(self.filtered_transactions(), self.today)
    }

    pub fn category_totals(&self, kind: TransactionKind) -> Vec<CategoryBucket> {
        SummaryService::category_totals(self.filtered_transactions(), &self.categories, kind)
    }

    pub fn finance_summary(&self) -> FinanceSummary {
        SummaryService::finance_summary(self.filtered_transactions(), self.today)
    }

    pub fn class_summaries(&self) -> Vec<ClassSummary> {
        SummaryService::class_summaries(self.filtered_students(), self.today)
    }

    /// Debt breakdown for a guardian; defaults to the current year.
    pub fn debt_consultation(
        &self,
        guardian_id: &str,
        year: Option<i32>,
    ) -> ServiceResult<DebtConsultation> {
        let guardian = self
            .guardian(guardian_id)
            .ok_or_else(|| ServiceError::GuardianNotFound(guardian_id.to_string()))?;
        let students = self.students_of_guardian(guardian_id);
        Ok(DebtService::consult(
            guardian,
            &students,
            year.unwrap_or_else(|| self.today.year()),
        ))
    }
}

fn rejected<T>(operation: &'static str, err: ServiceError) -> ServiceResult<T> {
    warn!(operation, error = %err, "Change rejected");
    Err(err)
}

/// First free number after the highest `<prefix><n>` id.
fn next_sequence<'a>(ids: impl Iterator<Item = &'a str>, prefix: &str) -> u64 {
    ids.filter_map(|id| id.strip_prefix(prefix)?.parse::<u64>().ok())
        .max()
        .map_or(1, |highest| highest + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BalletLevel, NewCostume};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    fn guardian_form() -> NewGuardian {
        NewGuardian {
            name: "Maria Souza".into(),
            phone: "(11) 91234-5678".into(),
            email: "maria@email.com".into(),
            cpf: "123.456.789-00".into(),
            relationship: "Mãe".into(),
            address: None,
        }
    }

    fn student_form(guardian_id: &str) -> NewStudent {
        NewStudent {
            name: "Julia Souza".into(),
            birth_date: NaiveDate::from_ymd_opt(2016, 3, 2).unwrap(),
            phone: String::new(),
            email: String::new(),
            level: BalletLevel::Iniciante,
            class: "Iniciante I".into(),
            branch_id: "centro".into(),
            monthly_fee: 100.0,
            guardian_id: guardian_id.into(),
            scholarship: None,
            costume: None,
        }
    }

    #[test]
    fn notification_feed_starts_with_two_unread() {
        let state = AppState::empty(today());
        assert_eq!(state.notifications().len(), 4);
        assert_eq!(state.unread_notifications(), 2);

        let (next, marked) = state.mark_notifications_read();
        assert_eq!(marked, 2);
        assert_eq!(next.unread_notifications(), 0);
        assert_eq!(state.unread_notifications(), 2);
        assert_eq!(next.mark_notifications_read().1, 0);
    }

    #[test]
    fn enrolling_bills_the_yearly_contract() {
        let state = AppState::empty(today());
        let (state, guardian_id) = state.add_guardian(guardian_form()).unwrap();
        let (state, student_id) = state.add_student(student_form(&guardian_id)).unwrap();

        let guardian = state.guardian(&guardian_id).unwrap();
        assert_eq!(guardian.student_ids, vec![student_id.clone()]);
        assert_eq!(guardian.wallet.ledger.len(), 1);
        assert_eq!(guardian.wallet.balance, 1000.0);
        assert_eq!(state.student(&student_id).unwrap().age, 8);
        assert_eq!(
            state.guardian_for_student(&student_id).map(|g| g.id.as_str()),
            Some(guardian_id.as_str())
        );
    }

    #[test]
    fn costume_adds_a_second_debit() {
        let (state, guardian_id) = AppState::empty(today()).add_guardian(guardian_form()).unwrap();
        let mut form = student_form(&guardian_id);
        form.costume = Some(NewCostume {
            purchased: true,
            total_amount: 240.0,
            installments: 2,
        });
        let (state, _) = state.add_student(form).unwrap();
        let wallet = &state.guardian(&guardian_id).unwrap().wallet;
        assert_eq!(wallet.ledger.len(), 2);
        assert_eq!(wallet.balance, 1240.0);
    }

    #[test]
    fn missing_guardian_leaves_snapshot_untouched() {
        let state = AppState::empty(today());
        let err = state.add_student(student_form("grd-404")).unwrap_err();
        assert!(matches!(err, ServiceError::GuardianNotFound(id) if id == "grd-404"));
        assert!(state.students().is_empty());
    }

    #[test]
    fn reducers_do_not_mutate_the_previous_snapshot() {
        let before = AppState::empty(today());
        let (after, _) = before.add_guardian(guardian_form()).unwrap();
        assert!(before.guardians().is_empty());
        assert_eq!(after.guardians().len(), 1);
        assert!(!before.toggle_sidebar().sidebar_open());
        assert!(before.sidebar_open());
    }

    #[test]
    fn ids_keep_counting_after_seeded_population() {
        let state = AppState::generate(11, today()).unwrap();
        let (_, id) = state.add_guardian(guardian_form()).unwrap();
        assert_eq!(id, format!("grd-{}", crate::seed::FAMILY_COUNT + 1));
    }

    #[test]
    fn branch_selection_filters_views() {
        let state = AppState::generate(5, today()).unwrap();
        let centro = state
            .select_branch(BranchFilter::Only("centro".into()))
            .unwrap();
        assert!(centro
            .filtered_students()
            .iter()
            .all(|s| s.branch_id == "centro"));
        assert!(centro.filtered_transactions().len() < state.filtered_transactions().len());
        assert!(state
            .select_branch(BranchFilter::Only("zona-leste".into()))
            .is_err());
    }

    #[test]
    fn tuition_payment_clears_promise() {
        let (state, guardian_id) = AppState::empty(today()).add_guardian(guardian_form()).unwrap();
        let (state, student_id) = state.add_student(student_form(&guardian_id)).unwrap();
        let (state, promise) = state.promise_payment(&student_id, None).unwrap();
        assert_eq!(promise.promised_date, NaiveDate::from_ymd_opt(2024, 5, 27).unwrap());
        assert_eq!(promise.guardian_name, "Maria Souza");

        let (state, _) = state
            .promise_payment(&student_id, Some(today()))
            .unwrap();
        assert_eq!(state.promises().len(), 1);

        let (state, txn_id) = state.register_tuition_payment(&student_id, 100.0).unwrap();
        assert!(state.promise_for(&student_id).is_none());
        let txn = &state.transactions()[0];
        assert_eq!(txn.id, txn_id);
        assert_eq!(txn.category_id, TUITION_CATEGORY_ID);
        assert_eq!(txn.guardian_id.as_deref(), Some(guardian_id.as_str()));

        assert!(state.register_tuition_payment(&student_id, 0.0).is_err());
    }

    #[test]
    fn debt_consultation_requires_known_guardian() {
        let state = AppState::empty(today());
        assert!(matches!(
            state.debt_consultation("grd-1", None),
            Err(ServiceError::GuardianNotFound(_))
        ));
    }
}
