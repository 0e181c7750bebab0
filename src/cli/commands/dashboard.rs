use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{bar, Table, TableColumn};
use crate::core::services::summary_service::{CategoryBucket, MonthlyFlow};
use crate::currency::{format_percent, LocaleConfig};
use crate::domain::TransactionKind;

use super::short_id;

const RECENT_COUNT: usize = 5;
const BAR_WIDTH: usize = 24;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "dashboard",
            "Overview: students, revenue, expenses and recent activity",
            "dashboard",
            cmd_dashboard,
        )
        .signed_in(),
        CommandEntry::new(
            "notifications",
            "Show the notification feed or mark it as read",
            "notifications [read]",
            cmd_notifications,
        )
        .signed_in(),
    ]
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let state = &context.state;
    let stats = state.dashboard_stats();
    let locale = context.locale();

    output::section(format!(
        "Dashboard [{}] {}",
        state.selected_branch(),
        context.date(state.today())
    ));
    output::info(format!("  Alunos ativos      : {}", stats.active_students));
    output::info(format!("  Pagamentos pendentes: {}", stats.pending_payments));
    output::info(format!(
        "  Receita do mês     : {} ({} vs. mês anterior)",
        context.money(stats.current_revenue),
        signed_percent(&locale, stats.revenue_change)
    ));
    output::info(format!(
        "  Despesas do mês    : {} ({} vs. mês anterior)",
        context.money(stats.current_expenses),
        signed_percent(&locale, stats.expense_change)
    ));
    output::info(format!("  Saldo do mês       : {}", context.money(stats.balance)));
    let unread = state.unread_notifications();
    if unread > 0 {
        output::hint(format!("{unread} unread notification(s); see `notifications`."));
    }

    print_revenue_chart(context, &state.revenue_series());
    print_category_chart(
        context,
        "Despesas por categoria",
        &state.category_totals(TransactionKind::Despesa),
    );

    output::section("Transações recentes");
    let recent = state.recent_transactions(RECENT_COUNT);
    if recent.is_empty() {
        output::info("No transactions for this branch.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Data"),
        TableColumn::left("Descrição").max(36),
        TableColumn::right("Valor"),
    ]);
    for transaction in recent {
        let amount = match transaction.kind {
            TransactionKind::Receita => context.money(transaction.amount),
            TransactionKind::Despesa => context.money(-transaction.amount),
        };
        table.push(vec![
            short_id(transaction.id),
            context.date(transaction.date),
            transaction.description.clone(),
            amount,
        ]);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_notifications(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        None => {}
        Some("read") => {
            let (next, unread) = context.state.mark_notifications_read();
            context.commit(next);
            output::success(format!("{unread} notification(s) marked as read."));
            return Ok(());
        }
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown notifications action `{other}`"
            )))
        }
    }

    let feed = context.state.notifications();
    output::section(format!(
        "Notificações ({} não lidas)",
        context.state.unread_notifications()
    ));
    for item in feed {
        let marker = if item.read { " " } else { "•" };
        output::info(format!("{marker} [{}] {} - {}", item.kind, item.title, item.time));
        output::info(format!("    {}", item.message));
    }
    Ok(())
}

fn signed_percent(locale: &LocaleConfig, value: f64) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{sign}{}", format_percent(locale, value))
}

/// Six-month revenue against expense bars.
pub(crate) fn print_revenue_chart(context: &ShellContext, series: &[MonthlyFlow]) {
    output::section("Receitas x Despesas (6 meses)");
    let max = series
        .iter()
        .map(|point| point.receitas.max(point.despesas))
        .fold(0.0, f64::max);
    for point in series {
        output::info(format!(
            "  {} {:<7} R {} {}",
            point.label,
            point.month.to_string(),
            bar(point.receitas, max, BAR_WIDTH),
            context.money_whole(point.receitas)
        ));
        output::info(format!(
            "  {:<11} D {} {}",
            "",
            bar(point.despesas, max, BAR_WIDTH),
            context.money_whole(point.despesas)
        ));
    }
}

pub(crate) fn print_category_chart(context: &ShellContext, title: &str, buckets: &[CategoryBucket]) {
    output::section(title);
    if buckets.is_empty() {
        output::info("  Nothing recorded.");
        return;
    }
    let locale = context.locale();
    let max = buckets.iter().map(|bucket| bucket.value).fold(0.0, f64::max);
    for bucket in buckets {
        output::info(format!(
            "  {:<24} {} {} ({})",
            bucket.name,
            bar(bucket.value, max, BAR_WIDTH),
            context.money_whole(bucket.value),
            format_percent(&locale, bucket.share)
        ));
    }
}
