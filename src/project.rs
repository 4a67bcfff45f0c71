//! Project files: a partially filled options record stored as pretty-printed JSON.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::ProjectError;
use crate::options::OptionsBuilder;

/// Conventional extension for project files.
pub const PROJECT_EXTENSION: &str = "json";

/// Writes `options` to `path`, replacing any existing file.
pub fn save_project(path: &Path, options: &OptionsBuilder) -> Result<(), ProjectError> {
    let json = serde_json::to_string_pretty(options).map_err(|source| ProjectError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json + "\n").map_err(|source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Saved project {}", path.display());
    Ok(())
}

/// Reads a project file. Fields missing from the file stay unset.
///
/// The record is not validated here; call [`OptionsBuilder::build`] for that.
pub fn load_project(path: &Path) -> Result<OptionsBuilder, ProjectError> {
    let text = fs::read_to_string(path).map_err(|source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ProjectError::Json {
        path: path.to_path_buf(),
        source,
    })
}
