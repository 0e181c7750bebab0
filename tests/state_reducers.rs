mod common;

use ballet_core::core::services::{ServiceError, WalletService};
use ballet_core::core::AppState;
use ballet_core::domain::{EntryCategory, EntryKind, StudentStatus, TransactionKind};

#[test]
fn yearly_contract_is_a_single_debit() {
    let (state, guardian_id) = AppState::empty(common::today())
        .add_guardian(common::guardian_form("Sandra Alves"))
        .unwrap();
    let (state, student_id) = state
        .add_student(common::student_form(&guardian_id, 100.0))
        .unwrap();

    let wallet = &state.guardian(&guardian_id).unwrap().wallet;
    assert_eq!(wallet.ledger.len(), 1);
    let entry = &wallet.ledger[0];
    assert_eq!(entry.kind, EntryKind::Debit);
    assert_eq!(entry.category, EntryCategory::Tuition);
    assert_eq!(entry.amount, 1000.0);
    assert_eq!(entry.description, "Contrato Anual - Helena Costa");
    assert_eq!(wallet.balance, 1000.0);

    let student = state.student(&student_id).unwrap();
    assert_eq!(student.status, StudentStatus::Ativo);
    assert_eq!(student.enrollment_date, common::today());
    assert!(student.payment_history.is_empty());
}

#[test]
fn unknown_guardian_touches_no_ledger() {
    let state = common::seeded_state(3);
    let balances: Vec<f64> = state.guardians().iter().map(|g| g.wallet.balance).collect();

    let err = state
        .add_student(common::student_form("grd-999", 150.0))
        .unwrap_err();
    assert!(matches!(err, ServiceError::GuardianNotFound(_)));

    let after: Vec<f64> = state.guardians().iter().map(|g| g.wallet.balance).collect();
    assert_eq!(balances, after);
}

#[test]
fn seeded_wallets_are_consistent() {
    let state = common::seeded_state(3);
    assert!(state
        .guardians()
        .iter()
        .all(|guardian| WalletService::is_consistent(&guardian.wallet)));
    assert!(state.students().iter().all(|student| state
        .guardian_for_student(&student.id)
        .is_some_and(|guardian| guardian.student_ids.contains(&student.id))));
}

#[test]
fn invalid_forms_are_rejected_without_side_effects() {
    let (state, guardian_id) = AppState::empty(common::today())
        .add_guardian(common::guardian_form("Sandra Alves"))
        .unwrap();

    let mut form = common::student_form(&guardian_id, 0.5);
    assert!(matches!(
        state.add_student(form.clone()),
        Err(ServiceError::Validation { field: "monthly_fee", .. })
    ));
    form.monthly_fee = 120.0;
    form.branch_id = "zona-leste".into();
    assert!(matches!(
        state.add_student(form),
        Err(ServiceError::BranchNotFound(_))
    ));

    let mut guardian = common::guardian_form("Bruno");
    guardian.email = "sem-arroba".into();
    assert!(state.add_guardian(guardian).is_err());
    assert_eq!(state.guardians().len(), 1);
    assert!(state.students().is_empty());
}

#[test]
fn students_of_a_guardian_are_listed_together() {
    let (state, guardian_id) = AppState::empty(common::today())
        .add_guardian(common::guardian_form("Sandra Alves"))
        .unwrap();
    let (state, first) = state
        .add_student(common::student_form(&guardian_id, 100.0))
        .unwrap();
    let (state, second) = state
        .add_student(common::student_form(&guardian_id, 80.0))
        .unwrap();

    let ids: Vec<&str> = state
        .students_of_guardian(&guardian_id)
        .iter()
        .map(|student| student.id.as_str())
        .collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);
    assert_eq!(state.guardian(&guardian_id).unwrap().wallet.balance, 1800.0);
}

#[test]
fn tuition_payment_accepts_long_student_names() {
    let (state, guardian_id) = AppState::empty(common::today())
        .add_guardian(common::guardian_form("Sandra Alves"))
        .unwrap();
    let mut form = common::student_form(&guardian_id, 100.0);
    form.name = "Maria ".repeat(16).trim_end().to_string();
    let (state, student_id) = state.add_student(form).unwrap();
    let (state, _) = state.promise_payment(&student_id, None).unwrap();

    let (state, payment_id) = state.register_tuition_payment(&student_id, 100.0).unwrap();

    let payment = state
        .transactions()
        .iter()
        .find(|transaction| transaction.id == payment_id)
        .unwrap();
    assert_eq!(payment.kind, TransactionKind::Receita);
    assert_eq!(payment.category_id, "rec-mensalidade");
    assert_eq!(payment.branch_id, "zona-sul");
    assert_eq!(payment.student_id.as_deref(), Some(student_id.as_str()));
    assert!(payment.description.chars().count() > 100);
    assert!(state.promise_for(&student_id).is_none());

    assert!(matches!(
        state.register_tuition_payment(&student_id, 0.0),
        Err(ServiceError::Validation { field: "amount", .. })
    ));
    assert!(matches!(
        state.register_tuition_payment("std-999", 100.0),
        Err(ServiceError::StudentNotFound(_))
    ));
}
