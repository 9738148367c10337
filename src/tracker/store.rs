use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

pub const DAY_STATS_KEY: &str = "goldwise_day_stats_v1";
pub const HISTORY_KEY: &str = "goldwise_price_history_v1";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable client-local key-value persistence. Core state transitions stay
/// pure; this seam is the only I/O on the client side.
pub trait StateRepository {
    /// Corrupt or missing stored JSON reads as "no prior state".
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T>;

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError>;
}

impl<R: StateRepository> StateRepository for &R {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        (**self).load(key)
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        (**self).save(key, value)
    }
}

/// One JSON file per key under a data directory. Saves are all-or-nothing:
/// written to a temp file, then renamed over the target.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateRepository for JsonFileStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = fs::read(self.path_for(key)).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding corrupt state for '{}': {}", key, e);
                None
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        let target = self.path_for(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &target)?;
        Ok(())
    }
}
