//! Marqueur « dernière URL vue » du document de remplacements.
//!
//! Sert uniquement à éviter de retélécharger un document inchangé ; la fusion
//! n'en dépend pas.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

/// Clé par défaut : fichier `last_docx_url.txt` dans le répertoire du store.
pub const DOCX_URL_KEY: &str = "last_docx_url";

#[derive(Error, Debug)]
pub enum MarkerError {
    #[error("invalid marker key: {0:?}")]
    InvalidKey(String),
    #[error("marker I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("marker store lock poisoned")]
    Poisoned,
}

pub trait MarkerStore {
    /// Valeur mémorisée pour `key`, `None` si absente.
    fn get(&self, key: &str) -> Result<Option<String>, MarkerError>;
    fn set(&self, key: &str, value: &str) -> Result<(), MarkerError>;
}

/// Un fichier texte d'une ligne par clé, écrit de manière atomique.
#[derive(Debug, Clone)]
pub struct FileMarkerStore {
    dir: PathBuf,
}

impl FileMarkerStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, MarkerError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(MarkerError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.txt")))
    }
}

impl MarkerStore for FileMarkerStore {
    fn get(&self, key: &str) -> Result<Option<String>, MarkerError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw.trim().to_string())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(MarkerError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MarkerError> {
        let path = self.path_for(key)?;
        let io_err = |source: std::io::Error| MarkerError::Io {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(value.trim().as_bytes()).map_err(io_err)?;
        tmp.flush().map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

/// Store en mémoire, pour les tests et les exécutions sans disque.
#[derive(Debug, Default)]
pub struct MemoryMarkerStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarkerStore for MemoryMarkerStore {
    fn get(&self, key: &str) -> Result<Option<String>, MarkerError> {
        let values = self.values.lock().map_err(|_| MarkerError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MarkerError> {
        let mut values = self.values.lock().map_err(|_| MarkerError::Poisoned)?;
        values.insert(key.to_string(), value.trim().to_string());
        Ok(())
    }
}

/// Compare `url` à la valeur mémorisée et la remplace si elle diffère.
pub fn has_url_changed(
    store: &dyn MarkerStore,
    key: &str,
    url: &str,
) -> Result<bool, MarkerError> {
    let url = url.trim();
    let previous = store.get(key)?.unwrap_or_default();
    if previous == url {
        return Ok(false);
    }
    store.set(key, url)?;
    info!(key, url, "replacement document URL changed");
    Ok(true)
}
