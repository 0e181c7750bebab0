//! Deterministic synthetic population for the back office.
//!
//! Everything is drawn from a [`StdRng`] seeded by the caller, so the same
//! seed and "today" always produce the same school.

mod data;

use chrono::{Datelike, Months, NaiveDate};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::info;
use uuid::Builder;

use crate::core::services::{PaymentService, ServiceResult, TransactionService, WalletService};
use crate::domain::{
    BalletLevel, Branch, Costume, EntryCategory, Guardian, MonthRef, Scholarship, ScholarshipKind,
    Student, StudentStatus, Transaction, TransactionCategory, TransactionKind, Wallet,
    TUITION_CATEGORY_ID,
};

pub use data::{branches, notifications};

/// Guardian/student pairs created by [`generate`].
pub const FAMILY_COUNT: usize = 300;
/// Calendar months of cash flow generated, current month included.
pub const CASH_FLOW_MONTHS: u32 = 6;

/// Collections produced by the generator.
#[derive(Debug, Clone)]
pub struct SeedData {
    pub branches: Vec<Branch>,
    pub categories: Vec<TransactionCategory>,
    pub guardians: Vec<Guardian>,
    pub students: Vec<Student>,
    /// Sorted by date, newest first.
    pub transactions: Vec<Transaction>,
}

pub fn generate(seed: u64, today: NaiveDate) -> ServiceResult<SeedData> {
    let mut rng = StdRng::seed_from_u64(seed);
    let branches = data::branches();
    let mut guardians = Vec::with_capacity(FAMILY_COUNT);
    let mut students = Vec::with_capacity(FAMILY_COUNT);

    for index in 0..FAMILY_COUNT {
        let (guardian, student) = family(&mut rng, index, &branches, today)?;
        guardians.push(guardian);
        students.push(student);
    }
    let transactions = cash_flow(&mut rng, &branches, &students, today);

    info!(
        seed,
        %today,
        guardians = guardians.len(),
        students = students.len(),
        active = students.iter().filter(|s| s.is_active()).count(),
        transactions = transactions.len(),
        "Generated school population"
    );

    Ok(SeedData {
        branches,
        categories: TransactionCategory::catalog(),
        guardians,
        students,
        transactions,
    })
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn between<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    rng.gen_range(min..=max)
}

fn phone<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "(11) 9{}-{}",
        between(rng, 1000, 9999),
        between(rng, 1000, 9999)
    )
}

fn family<R: Rng + ?Sized>(
    rng: &mut R,
    index: usize,
    branches: &[Branch],
    today: NaiveDate,
) -> ServiceResult<(Guardian, Student)> {
    let first_name = pick(rng, data::FIRST_NAMES);
    let last_name = pick(rng, data::LAST_NAMES);
    let level = BalletLevel::ALL[rng.gen_range(0..BalletLevel::ALL.len())];
    let branch_id = branches[rng.gen_range(0..branches.len())].id.clone();

    let (oldest, youngest) = level.birth_years();
    let birth_year = rng.gen_range(oldest..=youngest);
    let birth_date =
        NaiveDate::from_ymd_opt(birth_year, between(rng, 1, 12), between(rng, 1, 28))
            .unwrap_or(today);
    let enrollment_date = today
        .checked_sub_months(Months::new(between(rng, 1, 36)))
        .unwrap_or(today);
    let monthly_fee = level.monthly_fee();
    let payment_history =
        PaymentService::generate_history(rng, enrollment_date, today, monthly_fee);

    let student_id = format!("std-{}", index + 1);
    let guardian_id = format!("grd-{}", index + 1);
    let lower_last = last_name.to_lowercase();

    let mut guardian = Guardian {
        id: guardian_id.clone(),
        name: format!("{} {last_name}", pick(rng, data::GUARDIAN_FIRST_NAMES)),
        phone: phone(rng),
        email: format!("responsavel.{lower_last}{index}@email.com"),
        cpf: format!(
            "{}.{}.{}-{}",
            between(rng, 100, 999),
            between(rng, 100, 999),
            between(rng, 100, 999),
            between(rng, 10, 99)
        ),
        relationship: pick(rng, data::RELATIONSHIPS).to_string(),
        address: Some(format!(
            "Rua {}, {} - {}",
            pick(rng, data::STREETS),
            between(rng, 1, 999),
            pick(rng, data::NEIGHBOURHOODS)
        )),
        student_ids: vec![student_id.clone()],
        wallet: Wallet::default(),
    };

    let has_scholarship = rng.gen_bool(0.2);
    let has_costume = rng.gen_bool(0.4);
    let costume_price = f64::from(between(rng, 150, 300));

    let scholarship = has_scholarship.then(|| Scholarship {
        kind: if rng.gen_bool(0.5) {
            ScholarshipKind::Percentage
        } else {
            ScholarshipKind::Fixed
        },
        value: if rng.gen_bool(0.5) { 10.0 } else { 50.0 },
    });
    let costume = if has_costume {
        let installments = between(rng, 1, 3);
        let paid_amount = if rng.gen_bool(0.5) { costume_price } else { 0.0 };
        Some(Costume {
            purchased: true,
            total_amount: costume_price,
            installments,
            paid_amount,
        })
    } else {
        None
    };
    let status = if rng.gen_bool(0.9) {
        StudentStatus::Ativo
    } else if rng.gen_bool(0.5) {
        StudentStatus::Inativo
    } else {
        StudentStatus::Trancado
    };

    let student = Student {
        id: student_id,
        name: format!("{first_name} {last_name}"),
        birth_date,
        age: today.year() - birth_year,
        phone: phone(rng),
        email: format!("{}.{lower_last}@email.com", first_name.to_lowercase()),
        level,
        class: level.classes()[rng.gen_range(0..2)].to_string(),
        branch_id,
        enrollment_date,
        status,
        monthly_fee,
        guardian_id,
        payment_history,
        scholarship,
        costume,
    };

    WalletService::apply_debit(
        &mut guardian.wallet,
        monthly_fee * 10.0,
        EntryCategory::Tuition,
        format!("Contrato Anual - {}", student.name),
        enrollment_date,
    )?;
    if let Some(costume) = student.purchased_costume() {
        WalletService::apply_debit(
            &mut guardian.wallet,
            costume.total_amount,
            EntryCategory::Costume,
            format!("Figurino - {}", student.name),
            enrollment_date,
        )?;
    }
    let settled_share = f64::from(between(rng, 50, 95)) / 100.0;
    let settled = guardian.wallet.balance * settled_share;
    WalletService::apply_credit(
        &mut guardian.wallet,
        settled,
        EntryCategory::Other,
        "Pagamentos parciais acumulados",
        today,
    )?;

    Ok((guardian, student))
}

fn cash_flow<R: Rng + ?Sized>(
    rng: &mut R,
    branches: &[Branch],
    students: &[Student],
    today: NaiveDate,
) -> Vec<Transaction> {
    let current = MonthRef::from_date(today);
    let mut rows = Vec::new();

    for offset in (0..CASH_FLOW_MONTHS as i32).rev() {
        let Some(month) = current.shift(-offset) else {
            continue;
        };
        for branch in branches {
            let mut book = Book {
                rows: &mut rows,
                month,
                branch_id: &branch.id,
            };

            for student in students
                .iter()
                .filter(|s| s.branch_id == branch.id && s.is_active())
            {
                if rng.gen_bool(0.95) {
                    let day = between(rng, 1, 10);
                    let row = book.push(
                        rng,
                        day,
                        format!("Mensalidade - {}", student.name),
                        student.monthly_fee,
                        TransactionKind::Receita,
                        TUITION_CATEGORY_ID,
                    );
                    row.student_id = Some(student.id.clone());
                }
            }

            if rng.gen_bool(0.3) {
                let (day, amount) = (between(rng, 1, 28), between(rng, 150, 250));
                book.push(
                    rng,
                    day,
                    "Nova matrícula",
                    f64::from(amount),
                    TransactionKind::Receita,
                    "rec-matricula",
                );
            }

            for _ in 0..between(rng, 2, 6) {
                let day = between(rng, 1, 28);
                let item = pick(rng, data::UNIFORM_ITEMS);
                let amount = f64::from(between(rng, 50, 200));
                book.push(rng, day, item, amount, TransactionKind::Receita, "rec-uniforme");
            }

            book.push(
                rng,
                5,
                "Aluguel mensal",
                data::rent_for(&branch.id),
                TransactionKind::Despesa,
                "desp-aluguel",
            );

            for teacher in 1..=data::professors_for(&branch.id) {
                let amount = f64::from(between(rng, 800, 1500));
                book.push(
                    rng,
                    5,
                    format!("Professora {teacher}"),
                    amount,
                    TransactionKind::Despesa,
                    "desp-professores",
                );
            }

            let power = f64::from(between(rng, 150, 300));
            book.push(rng, 15, "Energia elétrica", power, TransactionKind::Despesa, "desp-utilidades");
            let water = f64::from(between(rng, 80, 150));
            book.push(rng, 10, "Água", water, TransactionKind::Despesa, "desp-utilidades");
            book.push(rng, 8, "Internet", 100.0, TransactionKind::Despesa, "desp-utilidades");

            if rng.gen_bool(0.3) {
                let day = between(rng, 1, 28);
                let job = pick(rng, data::MAINTENANCE_JOBS);
                let amount = f64::from(between(rng, 100, 500));
                book.push(rng, day, job, amount, TransactionKind::Despesa, "desp-manutencao");
            }

            let cleaning = f64::from(between(rng, 300, 500));
            book.push(
                rng,
                1,
                "Serviço de limpeza mensal",
                cleaning,
                TransactionKind::Despesa,
                "desp-limpeza",
            );

            if rng.gen_bool(0.3) {
                let day = between(rng, 1, 28);
                let action = pick(rng, data::MARKETING_ACTIONS);
                let amount = f64::from(between(rng, 200, 800));
                book.push(rng, day, action, amount, TransactionKind::Despesa, "desp-marketing");
            }
        }
    }

    TransactionService::sort_by_date_desc(&mut rows);
    rows
}

/// Appends rows for one branch and month.
struct Book<'a> {
    rows: &'a mut Vec<Transaction>,
    month: MonthRef,
    branch_id: &'a str,
}

impl Book<'_> {
    fn push<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        day: u32,
        description: impl Into<String>,
        amount: f64,
        kind: TransactionKind,
        category_id: &str,
    ) -> &mut Transaction {
        self.rows.push(Transaction {
            id: Builder::from_random_bytes(rng.gen()).into_uuid(),
            date: self.month.day_clamped(day),
            description: description.into(),
            amount,
            kind,
            category_id: category_id.to_string(),
            branch_id: self.branch_id.to_string(),
            student_id: None,
            guardian_id: None,
        });
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }
}
