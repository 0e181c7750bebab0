//! Shell context, dispatch and error reporting.

use std::{
    env, io,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use tracing::{debug, warn};

use crate::auth::{AuthError, AuthStore, SessionStore};
use crate::config::{Config, ConfigError, ConfigManager};
use crate::core::{services::ServiceError, utils, AppState, Clock, FixedClock, SystemClock};
use crate::currency::{format_currency, format_date, minor_units_for, CurrencyCode, LocaleConfig};

use super::commands;
use super::output;
use super::registry::CommandRegistry;

/// Pins the session's "today" (`YYYY-MM-DD`), mostly for scripted runs.
pub const TODAY_ENV: &str = "BALLET_CORE_TODAY";

const HISTORY_FILE: &str = "history.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error("You need to sign in first.")]
    NotSignedIn,
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("exit requested")]
    ExitRequested,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Command(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) state: AppState,
    pub(crate) auth: AuthStore,
    pub(crate) config_manager: ConfigManager,
    pub(crate) config: Config,
    pub(crate) last_command: Option<String>,
    pub(crate) running: bool,
    clock: Box<dyn Clock>,
    data_dir: PathBuf,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::open(mode, &utils::app_data_dir(), session_clock())
    }

    /// Builds a shell whose config and session live under `base_dir`.
    pub fn open(mode: CliMode, base_dir: &Path, clock: Box<dyn Clock>) -> Result<Self, CliError> {
        let today = clock.today();
        let config_manager = ConfigManager::with_base_dir(base_dir);
        let config = config_manager.load()?;

        let generated = AppState::generate(config.seed, today)?;
        let state = match generated.select_branch(config.default_branch.clone()) {
            Ok(state) => state,
            Err(err) => {
                warn!(error = %err, "Ignoring stored default branch");
                generated
            }
        };
        let auth = AuthStore::open(SessionStore::with_path(base_dir.join("session.json")))?;

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let context = Self {
            mode,
            registry,
            state,
            auth,
            config_manager,
            config,
            last_command: None,
            running: true,
            clock,
            data_dir: base_dir.to_path_buf(),
        };
        context.apply_output_preferences();
        Ok(context)
    }

    /// Colors only reach interactive terminals.
    pub(crate) fn apply_output_preferences(&self) {
        output::set_preferences(output::OutputPreferences {
            color: self.config.ui_color_enabled && self.mode == CliMode::Interactive,
        });
    }

    pub(crate) fn history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }

    /// Long sessions keep "today" in step with the clock.
    fn roll_date(&mut self) {
        let today = self.clock.today();
        if today != self.state.today() {
            debug!(%today, "Date rolled over");
            self.state = self.state.with_today(today);
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        let user = self
            .auth
            .current_user()
            .map(|user| format!("{}@", user.name))
            .unwrap_or_default();
        format!("{user}ballet[{}]> ", self.state.selected_branch())
    }

    /// Swaps in the snapshot produced by a reducer.
    pub(crate) fn commit(&mut self, next: AppState) {
        self.state = next;
    }

    pub(crate) fn locale(&self) -> LocaleConfig {
        self.config.locale_config()
    }

    pub(crate) fn money(&self, value: f64) -> String {
        let code = CurrencyCode::new(self.config.currency.clone());
        let precision = minor_units_for(code.as_str());
        format_currency(value, &code, &self.locale(), precision)
    }

    pub(crate) fn money_whole(&self, value: f64) -> String {
        let code = CurrencyCode::new(self.config.currency.clone());
        format_currency(value, &code, &self.locale(), 0)
    }

    pub(crate) fn date(&self, date: NaiveDate) -> String {
        format_date(&self.locale(), date)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(entry) = self.registry.get(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        if entry.requires_session && !self.auth.is_authenticated() {
            return Err(CommandError::NotSignedIn);
        }
        let handler = entry.handler;
        self.roll_date();
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = crate::cli::shell::parse_command_line(line)?;
        let Some(first) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = first.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, first, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{name}`?"));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        if let Some(line) = &self.last_command {
            debug!(command = %line, error = %err, "Command failed");
        }
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::NotSignedIn => {
                output::error("You need to sign in first.");
                output::hint("Use `login <email> <password>` or `register`.");
            }
            CommandError::Service(ServiceError::Validation { field, message }) => {
                output::error(format!("{field}: {message}"));
            }
            other => output::error(other),
        }
        Ok(())
    }
}

/// System clock unless `BALLET_CORE_TODAY` pins a date.
fn session_clock() -> Box<dyn Clock> {
    let Ok(raw) = env::var(TODAY_ENV) else {
        return Box::new(SystemClock);
    };
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => Box::new(FixedClock(date)),
        Err(_) => {
            warn!(value = %raw, "Ignoring unparsable {TODAY_ENV}");
            Box::new(SystemClock)
        }
    }
}

#[cfg(test)]
pub(crate) fn process_script(base_dir: &Path, lines: &[&str]) -> Result<ShellContext, CliError> {
    let today = NaiveDate::from_ymd_opt(2024, 5, 20)
        .ok_or_else(|| CliError::Command("invalid test date".into()))?;
    let mut context = ShellContext::open(CliMode::Script, base_dir, Box::new(FixedClock(today)))?;
    for line in lines {
        match context.process_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(context)
}
