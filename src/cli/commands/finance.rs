use crate::cli::args::{parse_amount, ArgMap};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::services::transaction_service::TransactionFilter;
use crate::core::services::PaymentService;
use crate::domain::{BranchFilter, MonthRef, NamedEntity, NewTransaction, TransactionKind};

use super::dashboard::{print_category_chart, print_revenue_chart};
use super::short_id;

const LIST_LIMIT: usize = 20;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "finance",
            "Cash-flow totals and charts for the selected branch",
            "finance",
            cmd_finance,
        )
        .signed_in(),
        CommandEntry::new(
            "transactions",
            "List transactions, newest first",
            "transactions [type=receita|despesa] [category=<id>] [limit=<n>|all]",
            cmd_transactions,
        )
        .signed_in(),
        CommandEntry::new(
            "transaction-add",
            "Record a revenue or expense",
            "transaction-add type=receita|despesa amount=<value> description=<text> category=<id> [branch=<id>] [date=YYYY-MM-DD]",
            cmd_transaction_add,
        )
        .signed_in(),
        CommandEntry::new(
            "categories",
            "List transaction categories",
            "categories [type=receita|despesa]",
            cmd_categories,
        )
        .signed_in(),
        CommandEntry::new(
            "tuition",
            "Tuition by class for the current month",
            "tuition [class=<name>]",
            cmd_tuition,
        )
        .signed_in(),
        CommandEntry::new(
            "pay",
            "Register a tuition payment (defaults to the monthly fee)",
            "pay <student-id> [amount]",
            cmd_pay,
        )
        .signed_in(),
        CommandEntry::new(
            "promise",
            "Record a payment promise (defaults to a week from today)",
            "promise <student-id> [date=YYYY-MM-DD]",
            cmd_promise,
        )
        .signed_in(),
        CommandEntry::new("promises", "List open payment promises", "promises", cmd_promises)
            .signed_in(),
        CommandEntry::new(
            "unpromise",
            "Drop a student's payment promise",
            "unpromise <student-id>",
            cmd_unpromise,
        )
        .signed_in(),
    ]
}

fn cmd_finance(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let state = &context.state;
    let summary = state.finance_summary();
    output::section(format!("Financeiro [{}]", state.selected_branch()));
    output::info(format!(
        "  Total receitas : {}",
        context.money(summary.total_revenue)
    ));
    output::info(format!(
        "  Total despesas : {}",
        context.money(summary.total_expenses)
    ));
    output::info(format!(
        "  Saldo total    : {}",
        context.money(summary.total_balance)
    ));
    output::info(format!(
        "  Mês atual      : {} receitas, {} despesas, saldo {}",
        context.money(summary.current_revenue),
        context.money(summary.current_expenses),
        context.money(summary.month_balance)
    ));
    output::info(format!("  Transações     : {}", summary.transaction_count));

    print_revenue_chart(context, &state.revenue_series());
    print_category_chart(
        context,
        "Receitas por categoria",
        &state.category_totals(TransactionKind::Receita),
    );
    print_category_chart(
        context,
        "Despesas por categoria",
        &state.category_totals(TransactionKind::Despesa),
    );
    Ok(())
}

fn cmd_transactions(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let map = ArgMap::parse(args);
    map.ensure_known(&["type", "category", "limit"])?;
    let filter = TransactionFilter {
        kind: map.parse_opt::<TransactionKind>("type")?,
        category_id: map.get("category").map(str::to_string),
    };
    let limit = match map.get("limit") {
        Some("all") => usize::MAX,
        _ => map.parse_opt::<usize>("limit")?.unwrap_or(LIST_LIMIT),
    };

    let state = &context.state;
    let transactions = state.search_transactions(&filter);
    output::section(format!(
        "Transações [{}] ({} encontradas)",
        state.selected_branch(),
        transactions.len()
    ));
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Data"),
        TableColumn::left("Descrição").max(36),
        TableColumn::left("Categoria").max(24),
        TableColumn::left("Filial"),
        TableColumn::right("Valor"),
    ]);
    for transaction in transactions.iter().take(limit) {
        let category = state
            .category(&transaction.category_id)
            .map_or(transaction.category_id.as_str(), NamedEntity::name);
        let amount = match transaction.kind {
            TransactionKind::Receita => context.money(transaction.amount),
            TransactionKind::Despesa => context.money(-transaction.amount),
        };
        table.push(vec![
            short_id(transaction.id),
            context.date(transaction.date),
            transaction.description.clone(),
            category.to_string(),
            transaction.branch_id.clone(),
            amount,
        ]);
    }
    output::info(table.render());
    if transactions.len() > limit {
        output::hint(format!(
            "Showing {limit} of {}. Use `limit=all` to see everything.",
            transactions.len()
        ));
    }
    Ok(())
}

fn cmd_transaction_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let map = ArgMap::parse(args);
    map.ensure_known(&["type", "amount", "description", "category", "branch", "date"])?;
    let branch_id = match (map.get("branch"), context.state.selected_branch()) {
        (Some(branch), _) => branch.to_string(),
        (None, BranchFilter::Only(selected)) => selected.clone(),
        (None, BranchFilter::All) => {
            return Err(CommandError::InvalidArguments(
                "`branch=<id>` is required while every branch is selected".into(),
            ))
        }
    };
    let data = NewTransaction {
        date: map.date_opt("date")?.unwrap_or(context.state.today()),
        description: map.require("description")?.to_string(),
        amount: parse_amount(map.require("amount")?)?,
        kind: map.parse_required("type")?,
        category_id: map.require("category")?.to_string(),
        branch_id,
        student_id: None,
        guardian_id: None,
    };
    let (next, id) = context.state.add_transaction(data)?;
    context.commit(next);
    output::success(format!("Transaction {} recorded.", short_id(id)));
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let map = ArgMap::parse(args);
    map.ensure_known(&["type"])?;
    let kind = map.parse_opt::<TransactionKind>("type")?;
    output::section("Categorias");
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Nome"),
        TableColumn::left("Tipo"),
    ]);
    for category in context
        .state
        .categories()
        .iter()
        .filter(|category| kind.map_or(true, |kind| category.kind == kind))
    {
        table.push(vec![
            category.id.clone(),
            category.name.clone(),
            category.kind.label().to_string(),
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_tuition(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let map = ArgMap::parse(args);
    map.ensure_known(&["class"])?;
    let state = &context.state;
    let month = MonthRef::from_date(state.today());
    let classes = state.class_summaries();

    let Some(class_name) = map.get("class") else {
        output::section(format!("Mensalidades por turma ({month})"));
        let mut table = Table::new(vec![
            TableColumn::left("Turma"),
            TableColumn::right("Alunos"),
            TableColumn::right("Previsto"),
            TableColumn::right("Recebido"),
            TableColumn::right("Em aberto"),
        ]);
        for class in &classes {
            table.push(vec![
                class.class_name.clone(),
                class.student_count.to_string(),
                context.money(class.total_expected),
                context.money(class.total_received),
                context.money(class.total_expected - class.total_received),
            ]);
        }
        output::info(table.render());
        return Ok(());
    };

    let class = classes
        .iter()
        .find(|class| class.class_name.eq_ignore_ascii_case(class_name))
        .ok_or_else(|| CommandError::Message(format!("No active students in class `{class_name}`")))?;
    output::section(format!("{} ({month})", class.class_name));
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Aluno").max(28),
        TableColumn::left("Responsável").max(28),
        TableColumn::right("Mensalidade"),
        TableColumn::left("Status"),
        TableColumn::left("Promessa"),
    ]);
    for student in class.student_ids.iter().filter_map(|id| state.student(id)) {
        let guardian = state
            .guardian(&student.guardian_id)
            .map_or("-", |guardian| guardian.name.as_str());
        let promise = match state.promise_for(&student.id) {
            Some(promise) if promise.is_overdue(state.today()) => {
                format!("{} (vencida)", context.date(promise.promised_date))
            }
            Some(promise) => context.date(promise.promised_date),
            None => String::new(),
        };
        table.push(vec![
            student.id.clone(),
            student.name.clone(),
            guardian.to_string(),
            context.money(student.monthly_fee),
            PaymentService::status_for_month(student, month)
                .label()
                .to_string(),
            promise,
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let map = ArgMap::parse(args);
    let student_id = map.require_positional(0, "student id")?;
    let amount = match map.positional(1) {
        Some(raw) => parse_amount(raw)?,
        None => context
            .state
            .student(student_id)
            .map(|student| student.monthly_fee)
            .ok_or_else(|| CommandError::Message(format!("Student not found: {student_id}")))?,
    };
    let (next, _) = context.state.register_tuition_payment(student_id, amount)?;
    context.commit(next);
    output::success(format!(
        "Payment of {} registered for {student_id}.",
        context.money(amount)
    ));
    Ok(())
}

fn cmd_promise(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let map = ArgMap::parse(args);
    map.ensure_known(&["date"])?;
    let student_id = map.require_positional(0, "student id")?;
    let (next, promise) = context
        .state
        .promise_payment(student_id, map.date_opt("date")?)?;
    context.commit(next);
    output::success(format!(
        "{} promised {} by {}.",
        promise.guardian_name,
        context.money(promise.amount),
        context.date(promise.promised_date)
    ));
    Ok(())
}

fn cmd_promises(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let state = &context.state;
    output::section("Promessas de pagamento");
    if state.promises().is_empty() {
        output::info("  No open promises.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Aluno"),
        TableColumn::left("Responsável"),
        TableColumn::right("Valor"),
        TableColumn::left("Data"),
        TableColumn::left(""),
    ]);
    for promise in state.promises() {
        table.push(vec![
            format!("{} ({})", promise.student_name, promise.student_id),
            promise.guardian_name.clone(),
            context.money(promise.amount),
            context.date(promise.promised_date),
            if promise.is_overdue(state.today()) {
                "vencida".to_string()
            } else {
                String::new()
            },
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_unpromise(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let student_id = ArgMap::parse(args).require_positional(0, "student id")?;
    let (next, removed) = context.state.remove_promise(student_id);
    context.commit(next);
    if removed {
        output::success(format!("Promise for {student_id} removed."));
    } else {
        output::info(format!("No promise recorded for {student_id}."));
    }
    Ok(())
}
