use crate::auth::StaffRole;
use crate::cli::args::ArgMap;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "login",
            "Sign in to the back office",
            "login <email> <password>",
            cmd_login,
        ),
        CommandEntry::new(
            "register",
            "Create a staff account and sign in",
            "register <name> <email> <password>",
            cmd_register,
        ),
        CommandEntry::new("logout", "End the current session", "logout", cmd_logout),
        CommandEntry::new("whoami", "Show the signed-in user", "whoami", cmd_whoami),
        CommandEntry::new(
            "staff",
            "List, add or remove staff with back-office access",
            "staff [list | add <name> <email> [role=admin|secretaria|professor] | remove <id|email>]",
            cmd_staff,
        )
        .signed_in(),
    ]
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let map = ArgMap::parse(args);
    let email = map.require_positional(0, "email")?;
    let password = map.require_positional(1, "password")?;
    let user = context.auth.login(email, password)?;
    output::success(format!("Welcome, {}!", user.name));
    Ok(())
}

fn cmd_register(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let map = ArgMap::parse(args);
    let name = map.require_positional(0, "name")?;
    let email = map.require_positional(1, "email")?;
    let password = map.require_positional(2, "password")?;
    let user = context.auth.register(name, email, password)?;
    output::success(format!("Account created. Welcome, {}!", user.name));
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.auth.is_authenticated() {
        output::info("No active session.");
        return Ok(());
    }
    context.auth.logout()?;
    output::success("Signed out.");
    Ok(())
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.auth.current_user() {
        Some(user) => output::info(format!("{} <{}> ({})", user.name, user.email, user.id)),
        None => output::info("Not signed in."),
    }
    Ok(())
}

fn cmd_staff(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let map = ArgMap::parse(args);
    match map.positional(0).map(str::to_ascii_lowercase).as_deref() {
        None | Some("list") => {
            output::section("Staff");
            let mut table = Table::new(vec![
                TableColumn::left("ID"),
                TableColumn::left("Name").max(28),
                TableColumn::left("Email"),
                TableColumn::left("Role"),
            ]);
            for member in context.auth.staff().members() {
                table.push(vec![
                    member.id.clone(),
                    member.name.clone(),
                    member.email.clone(),
                    member.role.label().to_string(),
                ]);
            }
            output::info(table.render());
        }
        Some("add") => {
            map.ensure_known(&["role"])?;
            let name = map.require_positional(1, "name")?;
            let email = map.require_positional(2, "email")?;
            let role = match map.get("role") {
                Some(raw) => StaffRole::parse(raw).ok_or_else(|| {
                    CommandError::InvalidArguments(format!("unknown role `{raw}`"))
                })?,
                None => StaffRole::Secretaria,
            };
            let member = context.auth.add_staff(name, email, role)?;
            output::success(format!(
                "Staff member {} added as {}.",
                member.email,
                member.role.label()
            ));
        }
        Some("remove") => {
            let key = map.require_positional(1, "staff id or email")?;
            let removed = context.auth.remove_staff(key)?;
            output::success(format!("Removed {} <{}>.", removed.name, removed.email));
        }
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown staff action `{other}`"
            )))
        }
    }
    Ok(())
}
