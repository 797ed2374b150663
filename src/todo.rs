use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode task list: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Flat task list persisted as a JSON array of strings.
///
/// Every mutation rewrites the whole file through a sibling temp file that is
/// renamed into place, so readers only ever see a complete list.
#[derive(Debug, Clone)]
pub struct TodoStore {
    path: PathBuf,
}

impl TodoStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing, empty or corrupt files all read as an empty list.
    pub fn load(&self) -> Vec<String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Could not read {:?}: {}", self.path, e);
                return Vec::new();
            }
        };

        if content.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str::<Vec<String>>(&content) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!("Ignoring unreadable todo file {:?}: {}", self.path, e);
                Vec::new()
            }
        }
    }

    pub fn save(&self, tasks: &[String]) -> Result<(), TodoError> {
        let json = serde_json::to_string(tasks)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let write_err = |source: std::io::Error| TodoError::Write {
            path: self.path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        debug!("Saved {} task(s) to {:?}", tasks.len(), self.path);
        Ok(())
    }

    pub fn add(&self, task: &str) -> Result<Vec<String>, TodoError> {
        let mut tasks = self.load();
        tasks.push(task.to_string());
        self.save(&tasks)?;
        Ok(tasks)
    }

    pub fn clear(&self) -> Result<(), TodoError> {
        self.save(&[])
    }
}
