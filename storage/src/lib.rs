//! Escrow Staking Storage Layer - File-Based Pool Snapshots
//!
//! The engine keeps all state in memory; a snapshot captures the pool
//! together with the token balances it was run against:
//! - JSON copy for inspection
//! - Bincode copy for fast loading

pub mod snapshot;

pub use snapshot::{PoolSnapshot, SnapshotSummary};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("Snapshot {name} is inconsistent: {reason}")]
    InvalidSnapshot { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Directory of named snapshots
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Open storage directory, creating it if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data_dir = path.as_ref().to_path_buf();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)?;
        }

        Ok(Self { data_dir })
    }

    fn json_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", name))
    }

    fn bin_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.bin", name))
    }

    /// Save a snapshot (JSON for readability, Bincode for speed)
    pub fn save_snapshot<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(self.json_path(name), json)?;

        let bin = bincode::serialize(data)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(self.bin_path(name), bin)?;

        Ok(())
    }

    /// Load a snapshot (tries Bincode first, falls back to JSON)
    pub fn load_snapshot<T: for<'de> Deserialize<'de>>(&self, name: &str) -> Result<T> {
        let bin_path = self.bin_path(name);
        if bin_path.exists() {
            let data = fs::read(&bin_path)?;
            return bincode::deserialize(&data)
                .map_err(|e| StorageError::SerializationError(e.to_string()));
        }

        let json_path = self.json_path(name);
        if json_path.exists() {
            let data = fs::read_to_string(&json_path)?;
            return serde_json::from_str(&data)
                .map_err(|e| StorageError::SerializationError(e.to_string()));
        }

        Err(StorageError::SnapshotNotFound(name.to_string()))
    }

    /// Persist a pool snapshot under `name`
    pub fn save_pool(&self, name: &str, snapshot: &PoolSnapshot) -> Result<()> {
        self.save_snapshot(name, snapshot)?;
        log::info!(
            "Saved pool snapshot {} at {} ({} stakes)",
            name,
            snapshot.taken_at,
            snapshot.pool.ledger().len()
        );
        Ok(())
    }

    /// Load a pool snapshot and re-check its bookkeeping
    pub fn load_pool(&self, name: &str) -> Result<PoolSnapshot> {
        let snapshot: PoolSnapshot = self.load_snapshot(name)?;
        snapshot
            .pool
            .check_invariants()
            .map_err(|e| StorageError::InvalidSnapshot {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        log::debug!("Loaded pool snapshot {} taken at {}", name, snapshot.taken_at);
        Ok(snapshot)
    }

    /// Check if snapshot exists
    pub fn has_snapshot(&self, name: &str) -> bool {
        self.bin_path(name).exists() || self.json_path(name).exists()
    }

    /// List all snapshot names, sorted
    pub fn list_snapshots(&self) -> Result<Vec<String>> {
        let mut snapshots = Vec::new();

        for entry in fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            if let Some(name) = path.file_stem().and_then(|name| name.to_str()) {
                if !snapshots.iter().any(|known| known == name) {
                    snapshots.push(name.to_string());
                }
            }
        }

        snapshots.sort();
        Ok(snapshots)
    }

    pub fn delete_snapshot(&self, name: &str) -> Result<()> {
        let bin_path = self.bin_path(name);
        let json_path = self.json_path(name);

        if bin_path.exists() {
            fs::remove_file(bin_path)?;
        }
        if json_path.exists() {
            fs::remove_file(json_path)?;
        }

        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
