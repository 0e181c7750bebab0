use std::path::{Path, PathBuf};

use crate::core::utils;
use crate::errors::SchoolError;
use crate::utils::persistence::{read_json, remove_if_exists, write_json_atomic};

use super::User;

/// JSON file holding the signed-in user between runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_path(utils::session_file())
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Option<User>, SchoolError> {
        read_json(&self.path)
    }

    pub fn save(&self, user: &User) -> Result<(), SchoolError> {
        write_json_atomic(&self.path, user)
    }

    pub fn clear(&self) -> Result<(), SchoolError> {
        remove_if_exists(&self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
