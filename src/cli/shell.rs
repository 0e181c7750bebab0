use std::{
    borrow::Cow,
    collections::HashMap,
    fs,
    io::{self, BufRead},
};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use tracing::{debug, warn};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;
use crate::utils::build_info;

/// Presence switches the shell to reading commands from stdin.
pub const SCRIPT_ENV: &str = "BALLET_CORE_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    let history = context.history_path();
    if let Err(err) = editor.load_history(&history) {
        debug!(path = %history.display(), error = %err, "Starting without shell history");
    }

    output::section(format!("Ballet Manager {}", build_info::current().short()));
    match context.auth.current_user() {
        Some(user) => output::info(format!("Signed in as {} <{}>.", user.name, user.email)),
        None => output::hint("Sign in with `login <email> <password>`; `help` lists commands."),
    }

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line).ok();
                if run_line(context, line)? == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                output::hint("Type `exit` or press Ctrl-D to leave.");
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    if let Some(parent) = history.parent() {
        fs::create_dir_all(parent).ok();
    }
    if let Err(err) = editor.save_history(&history) {
        warn!(path = %history.display(), error = %err, "Could not save shell history");
    }
    Ok(())
}

/// Reads one command per stdin line. Blank lines and `#` comments are skipped.
fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if run_line(context, line)? == LoopControl::Exit {
            break;
        }
        if !context.running {
            break;
        }
    }
    Ok(())
}

/// Command failures are reported and the loop goes on.
fn run_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    match handle_line(context, line) {
        Ok(control) => Ok(control),
        Err(err) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    context.last_command = Some(line.to_string());
    let tokens = parse_command_line(line)?;
    let Some(raw) = tokens.first() else {
        return Ok(LoopControl::Continue);
    };
    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens[1..].iter().map(String::as_str).collect();

    let control = context.dispatch(&command, raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Splits a line with shell quoting rules.
pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, CommandError> {
    shell_words::split(input)
        .map_err(|err| CommandError::InvalidArguments(format!("cannot parse line: {err}")))
}

/// Tab completion for command names and the fixed arguments some commands
/// take, plus an inline hint finishing an unambiguous command name.
struct CommandHelper {
    commands: Vec<String>,
    arguments: HashMap<&'static str, Vec<String>>,
}

impl CommandHelper {
    fn new(context: &ShellContext) -> Self {
        let mut commands: Vec<String> = context
            .command_names()
            .into_iter()
            .map(str::to_ascii_lowercase)
            .collect();
        commands.sort();
        commands.dedup();

        let mut branches: Vec<String> = context
            .state
            .branches()
            .iter()
            .map(|branch| branch.id.clone())
            .collect();
        branches.push("all".into());

        let words = |items: &[&str]| -> Vec<String> {
            items.iter().map(|item| item.to_string()).collect()
        };
        let mut arguments = HashMap::new();
        arguments.insert("branch", branches);
        arguments.insert("sidebar", words(&["open", "close", "toggle"]));
        arguments.insert("config", words(&["show", "get", "set"]));
        arguments.insert("categories", words(&["type=receita", "type=despesa"]));
        arguments.insert("staff", words(&["list", "add", "remove"]));
        arguments.insert("help", commands.clone());

        Self {
            commands,
            arguments,
        }
    }

    fn candidates(&self, preceding: &str) -> &[String] {
        let words: Vec<&str> = preceding.split_whitespace().collect();
        match words.as_slice() {
            [] => &self.commands,
            [command] => self
                .arguments
                .get(command.to_ascii_lowercase().as_str())
                .map(Vec::as_slice)
                .unwrap_or_default(),
            _ => &[],
        }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        let start = before.rfind(' ').map_or(0, |idx| idx + 1);
        let needle = before[start..].to_ascii_lowercase();
        let matches = self
            .candidates(&before[..start])
            .iter()
            .filter(|candidate| candidate.starts_with(&needle))
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate.clone(),
            })
            .collect();
        Ok((start, matches))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if line.is_empty() || pos < line.len() || line.contains(char::is_whitespace) {
            return None;
        }
        let needle = line.to_ascii_lowercase();
        let mut matches = self.commands.iter().filter(|name| name.starts_with(&needle));
        let only = matches.next()?;
        if matches.next().is_some() || only.len() == needle.len() {
            return None;
        }
        Some(only[needle.len()..].to_string())
    }
}

impl Highlighter for CommandHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        if output::current_preferences().color {
            Cow::Owned(hint.dimmed().to_string())
        } else {
            Cow::Borrowed(hint)
        }
    }
}

impl Validator for CommandHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbalanced_quotes_are_argument_errors() {
        let err = parse_command_line("guardian-add name=\"Maria").unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
        assert!(parse_command_line("   ").unwrap().is_empty());
    }
}
