use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::blockchain::{BlockRecord, Blockchain};
use crate::error::LedgerError;

/// A named JSON file holding one chain: `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
    file: String,
}

impl Storage {
    /// Bind a store to an existing directory. A `.json` suffix on `name` is
    /// accepted and not doubled.
    pub fn open(dir: impl Into<PathBuf>, name: &str) -> Result<Self, LedgerError> {
        let dir = dir.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Config("Please, enter a valid name.".into()));
        }
        if !dir.is_dir() {
            return Err(LedgerError::Storage {
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "storage directory does not exist",
                ),
                path: dir,
            });
        }

        let file = format!("{}.json", name.strip_suffix(".json").unwrap_or(name));
        Ok(Self { dir, file })
    }

    pub fn filepath(&self) -> PathBuf {
        self.dir.join(&self.file)
    }

    /// Write every block record of `chain`, replacing any previous content.
    pub fn save(&self, chain: &Blockchain) -> Result<PathBuf, LedgerError> {
        let path = self.filepath();
        let json = serde_json::to_string_pretty(&chain.records())?;
        fs::write(&path, json).map_err(|source| LedgerError::Storage {
            path: path.clone(),
            source,
        })?;
        info!("STORAGE - saved {} blocks to {}", chain.len(), path.display());
        Ok(path)
    }

    /// Rebuild the stored chain. Hashes are trusted until audited.
    pub fn load(&self) -> Result<Blockchain, LedgerError> {
        let path = self.filepath();
        let records = read_records(&path)?;
        debug!("STORAGE - read {} records from {}", records.len(), path.display());
        Blockchain::from_storage(records)
    }
}

fn read_records(path: &Path) -> Result<Vec<BlockRecord>, LedgerError> {
    let json = fs::read_to_string(path).map_err(|source| LedgerError::Storage {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&json)?)
}
