use crate::cli::args::ArgMap;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::services::debt_service::{DebtCategoryKind, DebtConsultation};
use crate::core::services::{DebtService, PaymentService, WalletService};
use crate::currency::format_percent;
use crate::domain::{Displayable, EntryKind, NewGuardian};

use super::short_id;
use super::students::payment_label;

const LIST_LIMIT: usize = 25;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "guardians",
            "List guardians and their outstanding balance",
            "guardians [search=<name|email|cpf>] [limit=<n>|all]",
            cmd_guardians,
        )
        .signed_in(),
        CommandEntry::new(
            "guardian",
            "Show a guardian, their students and wallet ledger",
            "guardian <guardian-id>",
            cmd_guardian,
        )
        .signed_in(),
        CommandEntry::new(
            "guardian-add",
            "Register a guardian",
            "guardian-add name=<name> phone=<phone> email=<email> cpf=<cpf> relationship=<text> [address=<text>]",
            cmd_guardian_add,
        )
        .signed_in(),
        CommandEntry::new(
            "debt",
            "Twelve-month debt consultation for a guardian",
            "debt <guardian-id> [year=<yyyy>] [category=tuition|costume]",
            cmd_debt,
        )
        .signed_in(),
    ]
}

fn cmd_guardians(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let map = ArgMap::parse(args);
    map.ensure_known(&["search", "limit"])?;
    let limit = match map.get("limit") {
        Some("all") => usize::MAX,
        _ => map.parse_opt::<usize>("limit")?.unwrap_or(LIST_LIMIT),
    };
    let guardians = context
        .state
        .search_guardians(map.get("search").unwrap_or_default());

    output::section(format!("Responsáveis ({} encontrados)", guardians.len()));
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Nome").max(28),
        TableColumn::left("Parentesco"),
        TableColumn::left("Telefone"),
        TableColumn::right("Alunos"),
        TableColumn::right("Saldo devedor"),
    ]);
    for guardian in guardians.iter().take(limit) {
        table.push(vec![
            guardian.id.clone(),
            guardian.name.clone(),
            guardian.relationship.clone(),
            guardian.phone.clone(),
            guardian.student_ids.len().to_string(),
            context.money(guardian.wallet.balance),
        ]);
    }
    output::info(table.render());
    if guardians.len() > limit {
        output::hint(format!(
            "Showing {limit} of {}. Use `limit=all` or narrow the search.",
            guardians.len()
        ));
    }
    Ok(())
}

fn cmd_guardian(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = ArgMap::parse(args).require_positional(0, "guardian id")?;
    let state = &context.state;
    let guardian = state
        .guardian(id)
        .ok_or_else(|| CommandError::Message(format!("Guardian not found: {id}")))?;

    output::section(format!("{} [{}] ({})", guardian.name, guardian.initials(), guardian.id));
    output::info(format!("  Parentesco: {}", guardian.relationship));
    output::info(format!("  Telefone  : {}", guardian.phone));
    output::info(format!("  Email     : {}", guardian.email));
    output::info(format!("  CPF       : {}", guardian.cpf));
    if let Some(address) = &guardian.address {
        output::info(format!("  Endereço  : {address}"));
    }

    output::section("Alunos");
    let students = state.students_of_guardian(&guardian.id);
    if students.is_empty() {
        output::info("  No students linked.");
    }
    for student in students {
        output::info(format!(
            "  {:<8} {} {}",
            student.id,
            student.display_label(),
            payment_label(PaymentService::current_status(student))
        ));
    }

    let wallet = &guardian.wallet;
    output::section("Carteira");
    output::info(format!(
        "  Débitos {} | Créditos {} | Saldo {}",
        context.money(WalletService::total_debits(wallet)),
        context.money(WalletService::total_credits(wallet)),
        context.money(wallet.balance)
    ));
    if wallet.is_in_credit() {
        output::info("  Guardian has credit with the school.");
    }
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Data"),
        TableColumn::left("Descrição").max(40),
        TableColumn::left("Categoria"),
        TableColumn::right("Valor"),
    ]);
    for entry in &wallet.ledger {
        let amount = match entry.kind {
            EntryKind::Debit => context.money(entry.amount),
            EntryKind::Credit => context.money(-entry.amount),
        };
        table.push(vec![
            short_id(entry.id),
            context.date(entry.date),
            entry.description.clone(),
            entry.category.label().to_string(),
            amount,
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_guardian_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let map = ArgMap::parse(args);
    map.ensure_known(&["name", "phone", "email", "cpf", "relationship", "address"])?;
    let data = NewGuardian {
        name: map.require("name")?.to_string(),
        phone: map.require("phone")?.to_string(),
        email: map.require("email")?.to_string(),
        cpf: map.require("cpf")?.to_string(),
        relationship: map.require("relationship")?.to_string(),
        address: map.get("address").map(str::to_string),
    };
    let (next, id) = context.state.add_guardian(data)?;
    context.commit(next);
    output::success(format!("Guardian {id} registered."));
    Ok(())
}

fn cmd_debt(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let map = ArgMap::parse(args);
    map.ensure_known(&["year", "category"])?;
    let id = map.require_positional(0, "guardian id")?;
    let year = map.parse_opt::<i32>("year")?;
    let only = match map.get("category").map(str::to_ascii_lowercase).as_deref() {
        None => None,
        Some("tuition" | "mensalidades") => Some(DebtCategoryKind::Tuition),
        Some("costume" | "figurino") => Some(DebtCategoryKind::Costume),
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown debt category `{other}`"
            )))
        }
    };

    let consultation = context.state.debt_consultation(id, year)?;
    let name = context
        .state
        .guardian(id)
        .map(|guardian| guardian.name.clone())
        .unwrap_or_default();
    output::section(format!("Consulta de débitos: {name} ({})", consultation.year));
    match only {
        Some(kind) => print_category(context, &consultation, kind),
        None => print_overview(context, &consultation),
    }
    Ok(())
}

fn print_overview(context: &ShellContext, consultation: &DebtConsultation) {
    let mut table = Table::new(vec![
        TableColumn::left("Mês"),
        TableColumn::right("Mensalidade"),
        TableColumn::left(""),
        TableColumn::right("Figurino"),
        TableColumn::left(""),
    ]);
    for month in &consultation.months {
        table.push(vec![
            month.label.clone(),
            context.money(month.tuition),
            paid_mark(month.tuition_paid).to_string(),
            context.money(month.costume),
            if month.costume > 0.0 {
                paid_mark(month.costume_paid).to_string()
            } else {
                String::new()
            },
        ]);
    }
    output::info(table.render());

    let locale = context.locale();
    output::info(format!(
        "  Total {} | Pago {} | Pendente {} ({} quitado)",
        context.money(consultation.grand_total),
        context.money(consultation.grand_paid),
        context.money(consultation.grand_pending),
        format_percent(
            &locale,
            DebtService::paid_percentage(consultation.grand_paid, consultation.grand_total)
        )
    ));
    for category in consultation.categories() {
        let status = if category.totals.is_settled() {
            "Quitado".to_string()
        } else {
            format!("{} pendente", context.money(category.totals.pending))
        };
        output::info(format!("  {:<13}: {status}", category.kind.label()));
    }
}

fn print_category(context: &ShellContext, consultation: &DebtConsultation, kind: DebtCategoryKind) {
    let Some(category) = consultation
        .categories()
        .into_iter()
        .find(|category| category.kind == kind)
    else {
        return;
    };
    let locale = context.locale();
    output::info(format!(
        "  {}: total {} | pago {} ({})",
        kind.label(),
        context.money(category.totals.total),
        context.money(category.totals.paid),
        format_percent(&locale, category.totals.paid_percentage())
    ));
    if category.months.is_empty() {
        output::info("  Nothing billed this year.");
        return;
    }
    for line in &category.months {
        output::info(format!(
            "  {:<10} {:>14} {}",
            line.label,
            context.money(line.amount),
            if line.paid { "pago" } else { "pendente" }
        ));
    }
}

fn paid_mark(paid: bool) -> &'static str {
    if paid {
        "pago"
    } else {
        "pendente"
    }
}
