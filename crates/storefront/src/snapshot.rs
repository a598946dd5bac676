//! Persistent cart snapshot store.
//!
//! A single-key JSON document on disk:
//!
//! ```json
//! { "@RocketShoes:cart": [ { "id": 1, "title": "...", "amount": 2 } ] }
//! ```
//!
//! Read once when the cart container is created, rewritten after every
//! successful cart mutation. Round-trips exactly: loading a saved
//! snapshot reproduces the same items in the same order.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use rocketshoes_core::Cart;

/// Storage key holding the serialized cart array.
pub const CART_KEY: &str = "@RocketShoes:cart";

/// Errors that can occur reading or writing the snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot file is not valid JSON or not a valid cart.
    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// File-backed store for the cart snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Create a store backed by the given file path.
    ///
    /// The file is not touched until the first [`Self::load`] or
    /// [`Self::save`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted cart.
    ///
    /// Returns `Ok(None)` when the file does not exist (normal first
    /// run) or when the document lacks the cart key.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the content is not
    /// a valid snapshot document.
    pub fn load(&self) -> Result<Option<Cart>, SnapshotError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut document: Map<String, Value> = serde_json::from_str(&raw)?;
        match document.remove(CART_KEY) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Persist the cart, replacing any previous snapshot.
    ///
    /// Writes to a sibling temp file and renames it into place so a
    /// crash mid-write never leaves a half-written snapshot behind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the filesystem write fails.
    pub fn save(&self, cart: &Cart) -> Result<(), SnapshotError> {
        let mut document = Map::new();
        document.insert(CART_KEY.to_string(), serde_json::to_value(cart)?);
        let body = serde_json::to_string_pretty(&Value::Object(document))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
