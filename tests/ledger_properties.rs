mod common;

use ballet_core::core::services::{DebtService, PaymentService, WalletService};
use ballet_core::core::AppState;
use ballet_core::domain::{
    uuid::Uuid, EntryCategory, MonthRef, NewCostume, NewTransaction, PaymentRecord,
    PaymentRecordStatus, PaymentStatus, TransactionKind, Wallet,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Enroll { fee: f64, costume: Option<(f64, u32)> },
    Cash { amount: f64, revenue: bool },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (
            1.0f64..2_000.0,
            proptest::option::of((1.0f64..1_000.0, 1u32..=3))
        )
            .prop_map(|(fee, costume)| Op::Enroll { fee, costume }),
        (0.01f64..10_000.0, any::<bool>()).prop_map(|(amount, revenue)| Op::Cash { amount, revenue }),
    ]
}

fn status_strategy() -> impl Strategy<Value = PaymentRecordStatus> {
    prop_oneof![
        Just(PaymentRecordStatus::Pago),
        Just(PaymentRecordStatus::Pendente),
        Just(PaymentRecordStatus::Atrasado),
    ]
}

fn history(statuses: &[PaymentRecordStatus]) -> Vec<PaymentRecord> {
    let start = MonthRef::new(2023, 1).expect("valid month");
    statuses
        .iter()
        .enumerate()
        .map(|(index, status)| PaymentRecord {
            id: Uuid::new_v4(),
            date: None,
            amount: 100.0,
            status: *status,
            reference: start.shift(index as i32).expect("month in range"),
        })
        .collect()
}

proptest! {
    #[test]
    fn wallet_balance_tracks_every_enrollment(ops in proptest::collection::vec(op_strategy(), 1..25)) {
        let (mut state, guardian_id) = AppState::empty(common::today())
            .add_guardian(common::guardian_form("Paula Mendes"))
            .unwrap();
        let mut expected = 0.0;
        let mut expected_entries = 0;

        for op in ops {
            match op {
                Op::Enroll { fee, costume } => {
                    let mut form = common::student_form(&guardian_id, fee);
                    form.costume = costume.map(|(total_amount, installments)| NewCostume {
                        purchased: true,
                        total_amount,
                        installments,
                    });
                    let (next, _) = state.add_student(form).unwrap();
                    state = next;
                    expected += fee * 10.0;
                    expected_entries += 1;
                    if let Some((total, _)) = costume {
                        expected += total;
                        expected_entries += 1;
                    }
                }
                Op::Cash { amount, revenue } => {
                    let (kind, category_id) = if revenue {
                        (TransactionKind::Receita, "rec-outros")
                    } else {
                        (TransactionKind::Despesa, "desp-outros")
                    };
                    let (next, _) = state
                        .add_transaction(NewTransaction {
                            date: common::today(),
                            description: "Lançamento avulso".into(),
                            amount,
                            kind,
                            category_id: category_id.into(),
                            branch_id: "centro".into(),
                            student_id: None,
                            guardian_id: None,
                        })
                        .unwrap();
                    state = next;
                }
            }
        }

        let wallet = &state.guardian(&guardian_id).unwrap().wallet;
        prop_assert!(WalletService::is_consistent(wallet));
        prop_assert_eq!(wallet.ledger.len(), expected_entries);
        prop_assert!((wallet.balance - expected).abs() <= 1e-6 * expected.max(1.0));
    }

    #[test]
    fn debits_and_credits_keep_balance_equal_to_ledger(
        moves in proptest::collection::vec((0.01f64..5_000.0, any::<bool>()), 0..40)
    ) {
        let mut wallet = Wallet::default();
        for (amount, debit) in moves {
            let result = if debit {
                WalletService::apply_debit(&mut wallet, amount, EntryCategory::Tuition, "Débito", common::today())
            } else {
                WalletService::apply_credit(&mut wallet, amount, EntryCategory::Other, "Crédito", common::today())
            };
            prop_assert!(result.is_ok());
        }
        prop_assert!(WalletService::is_consistent(&wallet));
        let net = WalletService::total_debits(&wallet) - WalletService::total_credits(&wallet);
        prop_assert!((net - wallet.balance).abs() <= 1e-6 * net.abs().max(1.0));
    }

    #[test]
    fn status_follows_the_latest_record(statuses in proptest::collection::vec(status_strategy(), 0..15)) {
        let records = history(&statuses);
        let derived = PaymentService::derive_status(&records);
        prop_assert_eq!(derived, statuses.last().copied().map(PaymentStatus::from));
        if statuses.last() == Some(&PaymentRecordStatus::Pago) {
            prop_assert_eq!(derived, Some(PaymentStatus::EmDia));
        }
    }

    #[test]
    fn paid_percentage_is_never_nan(paid in any::<f64>(), total in any::<f64>()) {
        let pct = DebtService::paid_percentage(paid, total);
        prop_assert!(!pct.is_nan());
        prop_assert!(pct <= 100.0);
    }
}

#[test]
fn rejected_amounts_leave_the_wallet_alone() {
    let mut wallet = Wallet::default();
    for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        assert!(WalletService::apply_debit(
            &mut wallet,
            amount,
            EntryCategory::Tuition,
            "x",
            common::today()
        )
        .is_err());
    }
    assert!(wallet.ledger.is_empty());
    assert_eq!(wallet.balance, 0.0);
}
