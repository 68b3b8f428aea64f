use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::warn;
use serde_json::Value;

use crate::{config::WorldStateConfig, session::error::PersistenceError};

/// Which of the two session documents a file holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    /// Per-dimension data: overlay shapes and the `data_storage` section.
    Dimension(i32),
    /// Data shared by every dimension of a world: renderer settings.
    Global,
}

/// Locates, reads and writes session documents under the storage directory.
#[derive(Clone, Debug)]
pub struct SessionStorage {
    directory: PathBuf,
    mod_id: String,
}

impl SessionStorage {
    pub fn new(directory: impl Into<PathBuf>, mod_id: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            mod_id: mod_id.into(),
        }
    }

    pub fn from_config(config: &WorldStateConfig) -> Self {
        Self::new(config.storage_dir(), config.mod_id.clone())
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// `<name>_dim<id>.json`, `<name>.json`, or `<mod id>_default.json` without a name.
    pub fn file_name(&self, world_name: Option<&str>, kind: DocumentKind) -> String {
        match (world_name, kind) {
            (Some(name), DocumentKind::Dimension(dimension)) => {
                format!("{}_dim{}.json", name, dimension)
            }
            (Some(name), DocumentKind::Global) => format!("{}.json", name),
            (None, _) => format!("{}_default.json", self.mod_id),
        }
    }

    /// Path of a document, creating the storage directory on demand. A directory that
    /// cannot be created is logged; later reads and writes then simply fail.
    pub fn path(&self, world_name: Option<&str>, kind: DocumentKind) -> PathBuf {
        if !self.directory.is_dir() {
            if let Err(error) = fs::create_dir_all(&self.directory) {
                warn!(
                    "Failed to create the config directory '{}': {}",
                    self.directory.display(),
                    error
                );
            }
        }
        self.directory.join(self.file_name(world_name, kind))
    }

    /// Read a document. A missing file is `Ok(None)`.
    pub fn read(&self, path: &Path) -> Result<Option<Value>, PersistenceError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let value: Value = serde_json::from_str(&text).map_err(|source| PersistenceError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        if !value.is_object() {
            return Err(PersistenceError::NotAnObject {
                path: path.to_path_buf(),
            });
        }
        Ok(Some(value))
    }

    pub fn write(&self, path: &Path, document: &Value) -> Result<(), PersistenceError> {
        let text = serde_json::to_string_pretty(document).map_err(|source| PersistenceError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
