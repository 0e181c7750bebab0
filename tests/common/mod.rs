#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use ballet_core::core::AppState;
use ballet_core::domain::{chrono::NaiveDate, BalletLevel, NewGuardian, NewStudent};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh data directory that survives until the test binary exits.
pub fn data_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 20).expect("valid date")
}

pub fn seeded_state(seed: u64) -> AppState {
    AppState::generate(seed, today()).expect("generate school")
}

pub fn guardian_form(name: &str) -> NewGuardian {
    NewGuardian {
        name: name.to_string(),
        phone: "(11) 98765-4321".into(),
        email: "familia@email.com".into(),
        cpf: "123.456.789-09".into(),
        relationship: "Mãe".into(),
        address: Some("Rua das Flores, 10".into()),
    }
}

pub fn student_form(guardian_id: &str, monthly_fee: f64) -> NewStudent {
    NewStudent {
        name: "Helena Costa".into(),
        birth_date: NaiveDate::from_ymd_opt(2014, 8, 9).expect("valid date"),
        phone: String::new(),
        email: String::new(),
        level: BalletLevel::Preparatorio,
        class: "Prep A".into(),
        branch_id: "zona-sul".into(),
        monthly_fee,
        guardian_id: guardian_id.to_string(),
        scholarship: None,
        costume: None,
    }
}
