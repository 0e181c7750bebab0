//! Validation, insertion and filtering for cash-flow transactions.

use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{Branch, NewTransaction, Transaction, TransactionCategory, TransactionKind};

pub const DESCRIPTION_MIN_CHARS: usize = 3;
pub const DESCRIPTION_MAX_CHARS: usize = 100;

/// Narrowing applied on top of the branch selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub category_id: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.kind.map_or(true, |kind| transaction.kind == kind)
            && self
                .category_id
                .as_deref()
                .map_or(true, |id| transaction.category_id == id)
    }
}

pub struct TransactionService;

impl TransactionService {
    /// Checks a transaction form and returns it with its description trimmed.
    pub fn validate(
        data: NewTransaction,
        branches: &[Branch],
        categories: &[TransactionCategory],
    ) -> ServiceResult<NewTransaction> {
        let mut data = Self::validate_posting(data, branches, categories)?;
        let description = data.description.trim();
        let length = description.chars().count();
        if !(DESCRIPTION_MIN_CHARS..=DESCRIPTION_MAX_CHARS).contains(&length) {
            return Err(ServiceError::validation(
                "description",
                format!(
                    "must have between {DESCRIPTION_MIN_CHARS} and {DESCRIPTION_MAX_CHARS} characters"
                ),
            ));
        }
        data.description = description.to_string();
        Ok(data)
    }

    /// Amount, category and branch checks shared by forms and the rows the
    /// school books on its own (tuition payments).
    pub fn validate_posting(
        data: NewTransaction,
        branches: &[Branch],
        categories: &[TransactionCategory],
    ) -> ServiceResult<NewTransaction> {
        if !data.amount.is_finite() || data.amount <= 0.0 {
            return Err(ServiceError::validation(
                "amount",
                "must be a positive number",
            ));
        }

        let category = categories
            .iter()
            .find(|category| category.id == data.category_id)
            .ok_or_else(|| ServiceError::CategoryNotFound(data.category_id.clone()))?;
        if category.kind != data.kind {
            return Err(ServiceError::validation(
                "category",
                format!("`{}` is not a {} category", category.id, data.kind),
            ));
        }

        if !branches.iter().any(|branch| branch.id == data.branch_id) {
            return Err(ServiceError::BranchNotFound(data.branch_id.clone()));
        }
        Ok(data)
    }

    /// Inserts a validated transaction and restores date-descending order.
    /// Among equal dates the newest insert comes first.
    pub fn insert(transactions: &mut Vec<Transaction>, data: NewTransaction) -> Uuid {
        let transaction = Transaction::from_new(data);
        let id = transaction.id;
        transactions.insert(0, transaction);
        Self::sort_by_date_desc(transactions);
        id
    }

    pub fn sort_by_date_desc(transactions: &mut [Transaction]) {
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
    }

    pub fn filter<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
        filter: &TransactionFilter,
    ) -> Vec<&'a Transaction> {
        transactions
            .into_iter()
            .filter(|transaction| filter.matches(transaction))
            .collect()
    }

    /// The first `count` entries of an already date-descending list.
    pub fn recent<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
        count: usize,
    ) -> Vec<&'a Transaction> {
        transactions.into_iter().take(count).collect()
    }
}
