use crate::cli::args::{parse_amount, parse_date, ArgMap};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::services::{student_service::StudentFilter, PaymentService};
use crate::domain::{
    BalletLevel, Displayable, NewCostume, NewStudent, PaymentStatus, Scholarship,
    ScholarshipKind, Student, StudentStatus,
};

const LIST_LIMIT: usize = 25;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "students",
            "List students of the selected branch",
            "students [search=<text>] [level=<level>] [status=ativo|inativo|trancado] [limit=<n>|all]",
            cmd_students,
        )
        .signed_in(),
        CommandEntry::new(
            "student",
            "Show a student's profile and payment history",
            "student <student-id>",
            cmd_student,
        )
        .signed_in(),
        CommandEntry::new(
            "student-add",
            "Enroll a student under an existing guardian",
            "student-add name=<name> birth=YYYY-MM-DD level=<level> class=<class> branch=<id> guardian=<id> [fee=<amount>] [phone=..] [email=..] [scholarship=<n>%|<amount>] [costume=<total>] [installments=1..3]",
            cmd_student_add,
        )
        .signed_in(),
    ]
}

fn cmd_students(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let map = ArgMap::parse(args);
    map.ensure_known(&["search", "level", "status", "limit"])?;
    let filter = StudentFilter {
        search: map.get("search").map(str::to_string),
        level: map.parse_opt::<BalletLevel>("level")?,
        status: map.parse_opt::<StudentStatus>("status")?,
    };
    let limit = match map.get("limit") {
        Some("all") => usize::MAX,
        _ => map.parse_opt::<usize>("limit")?.unwrap_or(LIST_LIMIT),
    };

    let students = context.state.search_students(&filter);
    output::section(format!(
        "Alunos [{}] ({} encontrados)",
        context.state.selected_branch(),
        students.len()
    ));
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Nome").max(28),
        TableColumn::right("Idade"),
        TableColumn::left("Nível"),
        TableColumn::left("Turma"),
        TableColumn::left("Status"),
        TableColumn::left("Pagamento"),
        TableColumn::right("Mensalidade"),
    ]);
    for student in students.iter().take(limit) {
        table.push(vec![
            student.id.clone(),
            student.name.clone(),
            student.age.to_string(),
            student.level.to_string(),
            student.class.clone(),
            student.status.label().to_string(),
            payment_label(PaymentService::current_status(student)).to_string(),
            context.money(student.monthly_fee),
        ]);
    }
    output::info(table.render());
    if students.len() > limit {
        output::hint(format!(
            "Showing {limit} of {}. Use `limit=all` or narrow the search.",
            students.len()
        ));
    }
    Ok(())
}

pub(crate) fn payment_label(status: Option<PaymentStatus>) -> &'static str {
    match status {
        Some(status) => status.label(),
        None => "sem histórico",
    }
}

fn cmd_student(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = ArgMap::parse(args).require_positional(0, "student id")?;
    let state = &context.state;
    let student = state
        .student(id)
        .ok_or_else(|| CommandError::Message(format!("Student not found: {id}")))?;

    output::section(format!("{} ({})", student.name, student.id));
    output::info(format!(
        "  Nascimento : {} ({} anos)",
        context.date(student.birth_date),
        student.age
    ));
    output::info(format!("  Nível/Turma: {} / {}", student.level, student.class));
    let branch = state
        .branch(&student.branch_id)
        .map_or(student.branch_id.as_str(), |branch| branch.name.as_str());
    output::info(format!("  Filial     : {branch}"));
    output::info(format!("  Matrícula  : {}", context.date(student.enrollment_date)));
    output::info(format!("  Status     : {}", student.status.label()));
    output::info(format!(
        "  Pagamento  : {}",
        payment_label(PaymentService::current_status(student))
    ));
    output::info(format!("  Mensalidade: {}", context.money(student.monthly_fee)));
    if !student.phone.is_empty() || !student.email.is_empty() {
        output::info(format!("  Contato    : {} {}", student.phone, student.email));
    }
    if let Some(scholarship) = student.scholarship {
        let value = match scholarship.kind {
            ScholarshipKind::Percentage => format!("{}%", scholarship.value),
            ScholarshipKind::Fixed => context.money(scholarship.value),
        };
        output::info(format!("  Bolsa      : {value}"));
    }
    if let Some(costume) = student.purchased_costume() {
        output::info(format!(
            "  Figurino   : {} em {}x ({} pagos)",
            context.money(costume.total_amount),
            costume.installments,
            context.money(costume.paid_amount)
        ));
    }
    match state.guardian(&student.guardian_id) {
        Some(guardian) => output::info(format!(
            "  Responsável: {} {} | saldo devedor {}",
            guardian.display_label(),
            guardian.phone,
            context.money(guardian.wallet.balance)
        )),
        None => output::warning(format!("Guardian {} is missing.", student.guardian_id)),
    }
    if let Some(promise) = state.promise_for(&student.id) {
        output::info(format!(
            "  Promessa   : {} até {}",
            context.money(promise.amount),
            context.date(promise.promised_date)
        ));
    }

    print_history(context, student);
    Ok(())
}

fn print_history(context: &ShellContext, student: &Student) {
    output::section("Histórico de pagamentos");
    if student.payment_history.is_empty() {
        output::info("  No billing history yet.");
        return;
    }
    let mut table = Table::new(vec![
        TableColumn::left("Referência"),
        TableColumn::right("Valor"),
        TableColumn::left("Status"),
        TableColumn::left("Pago em"),
    ]);
    for record in student.payment_history.iter().rev() {
        table.push(vec![
            record.reference.to_string(),
            context.money(record.amount),
            record.status.label().to_string(),
            record
                .date
                .map(|date| context.date(date))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    output::info(table.render());
}

fn cmd_student_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let map = ArgMap::parse(args);
    map.ensure_known(&[
        "name",
        "birth",
        "level",
        "class",
        "branch",
        "guardian",
        "fee",
        "phone",
        "email",
        "scholarship",
        "costume",
        "installments",
    ])?;

    let level: BalletLevel = map.parse_required("level")?;
    let monthly_fee = match map.get("fee") {
        Some(raw) => parse_amount(raw)?,
        None => level.monthly_fee(),
    };
    let costume = match map.get("costume") {
        Some(raw) => Some(NewCostume {
            purchased: true,
            total_amount: parse_amount(raw)?,
            installments: map.parse_opt("installments")?.unwrap_or(1),
        }),
        None => None,
    };
    let data = NewStudent {
        name: map.require("name")?.to_string(),
        birth_date: parse_date(map.require("birth")?)?,
        phone: map.get("phone").unwrap_or_default().to_string(),
        email: map.get("email").unwrap_or_default().to_string(),
        level,
        class: map.require("class")?.to_string(),
        branch_id: map.require("branch")?.to_string(),
        monthly_fee,
        guardian_id: map.require("guardian")?.to_string(),
        scholarship: map.get("scholarship").map(parse_scholarship).transpose()?,
        costume,
    };

    let (next, id) = context.state.add_student(data)?;
    context.commit(next);
    let guardian_balance = context
        .state
        .guardian_for_student(&id)
        .map(|guardian| guardian.wallet.balance)
        .unwrap_or_default();
    output::success(format!(
        "Student {id} enrolled. Guardian balance is now {}.",
        context.money(guardian_balance)
    ));
    Ok(())
}

/// `20%` is a percentage discount, anything else a fixed amount.
fn parse_scholarship(raw: &str) -> Result<Scholarship, CommandError> {
    match raw.trim().strip_suffix('%') {
        Some(percent) => Ok(Scholarship {
            kind: ScholarshipKind::Percentage,
            value: parse_amount(percent)?,
        }),
        None => Ok(Scholarship {
            kind: ScholarshipKind::Fixed,
            value: parse_amount(raw)?,
        }),
    }
}
