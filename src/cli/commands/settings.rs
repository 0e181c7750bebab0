use crate::cli::args::ArgMap;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::config::Config;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change preferences",
        "config [show | get <key> | set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let map = ArgMap::parse(args);
    match map.positional(0).map(str::to_ascii_lowercase).as_deref() {
        None | Some("show") => {
            output::section("Configuration");
            for key in Config::KEYS {
                output::field(key, context.config.get(key)?);
            }
            output::field("file", context.config_manager.path().display());
        }
        Some("get") => {
            let key = map.require_positional(1, "key")?;
            output::info(context.config.get(key)?);
        }
        Some("set") => {
            let key = map.require_positional(1, "key")?;
            let value = map.require_positional(2, "value")?;
            set_value(context, key, value)?;
        }
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config action `{other}`"
            )))
        }
    }
    Ok(())
}

fn set_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut updated = context.config.clone();
    updated.set(key, value)?;

    if key == "default_branch" {
        let next = context.state.select_branch(updated.default_branch.clone())?;
        context.commit(next);
    }
    context.config = updated;
    context.persist_config()?;

    if key == "color" {
        context.apply_output_preferences();
    }
    output::success("Configuration updated.");
    if key == "seed" {
        output::hint("The new seed generates a different school on the next start.");
    }
    Ok(())
}
