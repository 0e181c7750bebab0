//! Keeps a guardian's wallet balance in lockstep with its ledger.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{EntryCategory, EntryKind, LedgerEntry, Wallet};

/// Relative tolerance used when comparing the running balance with the ledger fold.
const BALANCE_EPSILON: f64 = 1e-6;

pub struct WalletService;

impl WalletService {
    /// Charges the guardian: appends a debit entry and raises the balance.
    pub fn apply_debit(
        wallet: &mut Wallet,
        amount: f64,
        category: EntryCategory,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> ServiceResult<Uuid> {
        Self::apply(wallet, EntryKind::Debit, amount, category, description, date)
    }

    /// Records a payment: appends a credit entry and lowers the balance.
    /// The balance may become negative.
    pub fn apply_credit(
        wallet: &mut Wallet,
        amount: f64,
        category: EntryCategory,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> ServiceResult<Uuid> {
        Self::apply(wallet, EntryKind::Credit, amount, category, description, date)
    }

    /// Balance implied by the ledger alone.
    pub fn recomputed_balance(wallet: &Wallet) -> f64 {
        wallet.ledger.iter().map(LedgerEntry::signed_amount).sum()
    }

    pub fn is_consistent(wallet: &Wallet) -> bool {
        let expected = Self::recomputed_balance(wallet);
        let scale = expected.abs().max(wallet.balance.abs()).max(1.0);
        (wallet.balance - expected).abs() <= BALANCE_EPSILON * scale
    }

    pub fn total_debits(wallet: &Wallet) -> f64 {
        Self::total_of(wallet, EntryKind::Debit)
    }

    pub fn total_credits(wallet: &Wallet) -> f64 {
        Self::total_of(wallet, EntryKind::Credit)
    }

    fn total_of(wallet: &Wallet, kind: EntryKind) -> f64 {
        wallet
            .ledger
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| entry.amount)
            .sum()
    }

    fn apply(
        wallet: &mut Wallet,
        kind: EntryKind,
        amount: f64,
        category: EntryCategory,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> ServiceResult<Uuid> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ServiceError::validation(
                "amount",
                format!("ledger amounts must be positive, got {amount}"),
            ));
        }
        let entry = LedgerEntry::new(kind, amount, category, description, date);
        let id = entry.id;
        wallet.balance += entry.signed_amount();
        wallet.ledger.push(entry);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    #[test]
    fn debit_then_credit_keeps_balance_in_sync() {
        let mut wallet = Wallet::default();
        WalletService::apply_debit(
            &mut wallet,
            1000.0,
            EntryCategory::Tuition,
            "Contrato",
            date(),
        )
        .unwrap();
        WalletService::apply_credit(&mut wallet, 250.0, EntryCategory::Other, "PIX", date())
            .unwrap();

        assert_eq!(wallet.balance, 750.0);
        assert_eq!(wallet.ledger.len(), 2);
        assert_eq!(WalletService::total_debits(&wallet), 1000.0);
        assert_eq!(WalletService::total_credits(&wallet), 250.0);
        assert!(WalletService::is_consistent(&wallet));
    }

    #[test]
    fn credit_may_push_balance_negative() {
        let mut wallet = Wallet::default();
        WalletService::apply_credit(&mut wallet, 80.0, EntryCategory::Other, "Adiantamento", date())
            .unwrap();
        assert_eq!(wallet.balance, -80.0);
        assert!(wallet.is_in_credit());
    }

    #[test]
    fn rejects_non_positive_amounts_without_touching_wallet() {
        let mut wallet = Wallet::default();
        for amount in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let err = WalletService::apply_debit(
                &mut wallet,
                amount,
                EntryCategory::Material,
                "Sapatilha",
                date(),
            )
            .expect_err("invalid amount must be rejected");
            assert!(matches!(err, ServiceError::Validation { field: "amount", .. }));
        }
        assert!(wallet.ledger.is_empty());
        assert_eq!(wallet.balance, 0.0);
    }

    #[test]
    fn drift_is_detected() {
        let mut wallet = Wallet::default();
        WalletService::apply_debit(&mut wallet, 100.0, EntryCategory::Tuition, "x", date())
            .unwrap();
        wallet.balance += 5.0;
        assert!(!WalletService::is_consistent(&wallet));
    }
}
