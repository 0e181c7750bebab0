use dirs::home_dir;
use std::{env, path::PathBuf};

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "BALLET_CORE_HOME";

const DEFAULT_DIR_NAME: &str = ".ballet_core";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const SESSION_FILE: &str = "session.json";

/// Returns the application data directory, defaulting to `~/.ballet_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_dir() -> PathBuf {
    app_data_dir().join(CONFIG_DIR)
}

pub fn config_file() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Persisted auth session.
pub fn session_file() -> PathBuf {
    app_data_dir().join(SESSION_FILE)
}
