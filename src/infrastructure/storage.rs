use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::action::ActionData;
use crate::domain::error::{AppError, Result};

/// JSON file holding the `ActionData` document
#[derive(Debug, Clone)]
pub struct ActionStore {
    path: PathBuf,
}

impl ActionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document; a missing or unreadable file gives the default document.
    pub fn load(&self) -> ActionData {
        if !self.path.exists() {
            return ActionData::default();
        }
        match load_from_path(&self.path) {
            Ok(data) => data,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Failed to load action data, using defaults");
                ActionData::default()
            }
        }
    }

    /// Replace the document on disk.
    ///
    /// Writes a sibling temp file and renames it over the target so readers
    /// never see a half-written document.
    pub fn save(&self, data: &ActionData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let serialized = serde_json::to_string_pretty(data)
            .map_err(|err| AppError::Internal(format!("Failed to serialize action data: {}", err)))?;

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, serialized)
            .map_err(|err| AppError::IoError(format!("Failed to write action data: {}", err)))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|err| AppError::IoError(format!("Failed to replace action data: {}", err)))?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "action_data.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn load_from_path(path: &Path) -> Result<ActionData> {
    let content = fs::read_to_string(path)
        .map_err(|err| AppError::IoError(format!("Failed to read action data: {}", err)))?;
    serde_json::from_str(&content)
        .map_err(|err| AppError::ParseError(format!("Failed to parse action data: {}", err)))
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
