//! File-backed JSON key-value store
//!
//! Persists arbitrary serde values across restarts, one JSON file per key
//! under a caller-supplied directory. The accessory bridge uses it to keep
//! derived device configurations between startups so receivers do not need
//! to be re-queried every time.
//!
//! # Example
//!
//! ```no_run
//! use avr_store::{PersistStore, StoreOptions};
//!
//! # fn main() -> Result<(), avr_store::StoreError> {
//! let store = PersistStore::init(StoreOptions {
//!     dir: "/var/lib/avr-bridge".into(),
//!     forgive_parse_errors: true,
//! })?;
//!
//! store.set_item("cachedDevices", &vec!["RX-V675"])?;
//! let devices: Option<Vec<String>> = store.get_item("cachedDevices")?;
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error reading or writing a key file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be parsed, or a value could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Options controlling store initialization
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Directory holding one JSON file per key; created if absent
    pub dir: PathBuf,
    /// Treat unparseable key files as missing instead of failing
    pub forgive_parse_errors: bool,
}

/// A persistent key-value store backed by JSON files
#[derive(Debug, Clone)]
pub struct PersistStore {
    dir: PathBuf,
    forgive_parse_errors: bool,
}

impl PersistStore {
    /// Initialize the store, creating its directory if needed.
    pub fn init(options: StoreOptions) -> Result<Self> {
        fs::create_dir_all(&options.dir)?;
        Ok(Self {
            dir: options.dir,
            forgive_parse_errors: options.forgive_parse_errors,
        })
    }

    /// Read and deserialize the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key has never been written. A corrupt
    /// file is also reported as `Ok(None)` when the store was initialized
    /// with `forgive_parse_errors`, otherwise it is a `StoreError::Json`.
    pub fn get_item<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path_for(key);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&data) {
            Ok(value) => Ok(Some(value)),
            Err(_) if self.forgive_parse_errors => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Serialize `value` and store it under `key`, replacing any previous
    /// value.
    ///
    /// The value is written to a temporary file and renamed into place, so
    /// readers never observe a partially written file.
    pub fn set_item<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        let data = serde_json::to_vec_pretty(value)?;
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Remove the value stored under `key`, if any.
    pub fn remove_item(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Directory this store persists into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Map a key onto a safe file stem.
///
/// Keys are caller-controlled strings; anything outside `[A-Za-z0-9_-]`
/// becomes an underscore so a key can never escape the store directory.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
