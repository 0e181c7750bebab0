use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::domain::BranchFilter;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
        CommandEntry::new(
            "branch",
            "List branches or switch the branch filter",
            "branch [<branch-id>|all]",
            cmd_branch,
        )
        .signed_in(),
        CommandEntry::new(
            "sidebar",
            "Show or change the navigation panel state",
            "sidebar [open|close|toggle]",
            cmd_sidebar,
        ),
    ]
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Ballet Core {}", meta.short()));
    for (label, value) in [
        ("Commit", meta.commit.hash),
        ("Tree", meta.commit.tree),
        ("Built at", meta.built_at),
        ("Target", meta.target),
        ("Profile", meta.profile),
        ("Rustc", meta.rustc),
    ] {
        output::field(label, value);
    }
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(raw) = args.first() {
        match context.registry.get(&raw.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(raw),
        }
        return Ok(());
    }

    help::print_overview(&context.registry, context.auth.is_authenticated());
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

fn cmd_branch(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(raw) = args.first() {
        let next = context.state.select_branch(BranchFilter::parse(raw))?;
        context.commit(next);
        output::success(format!(
            "Branch filter set to `{}`.",
            context.state.selected_branch()
        ));
        return Ok(());
    }

    output::section("Branches");
    let selected = context.state.selected_branch().clone();
    let marker = |active: bool| if active { "*" } else { " " };
    output::info(format!(
        "{} {:<12} Todas as Filiais",
        marker(selected == BranchFilter::All),
        "all"
    ));
    for branch in context.state.branches() {
        let active = matches!(&selected, BranchFilter::Only(id) if *id == branch.id);
        output::info(format!(
            "{} {:<12} {} | {} | {}",
            marker(active),
            branch.id,
            branch.name,
            branch.address,
            branch.phone
        ));
    }
    Ok(())
}

fn cmd_sidebar(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let next = match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        None => None,
        Some("open") => Some(context.state.set_sidebar_open(true)),
        Some("close") => Some(context.state.set_sidebar_open(false)),
        Some("toggle") => Some(context.state.toggle_sidebar()),
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown sidebar action `{other}` (use open, close or toggle)"
            )))
        }
    };
    if let Some(next) = next {
        context.commit(next);
    }
    let label = if context.state.sidebar_open() {
        "open"
    } else {
        "closed"
    };
    output::info(format!("Sidebar is {label}."));
    Ok(())
}
