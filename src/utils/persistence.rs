use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::SchoolError;

/// Sibling path used to stage a write before the rename.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.tmp"),
        None => "tmp".to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `value` as pretty JSON, staging to a temporary file and renaming
/// it over the target so readers never see a partial file.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SchoolError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| SchoolError::io(parent, err))?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|source| SchoolError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json).map_err(|err| SchoolError::io(&tmp, err))?;
    fs::rename(&tmp, path).map_err(|err| SchoolError::io(path, err))
}

/// Reads JSON from `path`; a missing file yields `None`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SchoolError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(SchoolError::io(path, err)),
    };
    serde_json::from_str(&data)
        .map(Some)
        .map_err(|source| SchoolError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

/// Removes `path`, treating an already-missing file as success.
pub fn remove_if_exists(path: &Path) -> Result<(), SchoolError> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != ErrorKind::NotFound => Err(SchoolError::io(path, err)),
        _ => Ok(()),
    }
}
