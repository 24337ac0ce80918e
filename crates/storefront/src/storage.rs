//! Cart persistence.
//!
//! The cart is stored as one JSON document under the key [`CART_KEY`]. A
//! missing document reads as an empty cart. A document that exists but does
//! not parse is reported as [`StorageError::Corrupt`] and left in place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bookstore_core::Cart;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Key under which the cart document is stored.
pub const CART_KEY: &str = "cart";

/// Errors from reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored cart is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("Failed to serialize cart: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Durable home of the cart.
pub trait CartStorage {
    /// Read the stored cart; an absent document is an empty cart.
    async fn load(&self) -> Result<Cart, StorageError>;

    /// Replace the stored cart.
    async fn save(&self, cart: &Cart) -> Result<(), StorageError>;

    /// Remove the stored cart.
    async fn clear(&self) -> Result<(), StorageError>;
}

// =============================================================================
// File Storage
// =============================================================================

/// Cart stored as a JSON file on disk.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a reader never sees a half-written document.
#[derive(Debug, Clone)]
pub struct FileCartStorage {
    path: PathBuf,
}

impl FileCartStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CartStorage for FileCartStorage {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Cart, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Cart::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        serde_json::from_slice(&bytes).map_err(StorageError::Corrupt)
    }

    #[instrument(skip(self, cart), fields(path = %self.path.display(), entries = cart.len()))]
    async fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(cart).map_err(StorageError::Serialize)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        debug!("Cart saved");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn clear(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

// =============================================================================
// Memory Storage
// =============================================================================

/// Cart kept in memory as a serialized document.
///
/// Round-trips through JSON like [`FileCartStorage`] does.
#[derive(Debug, Default)]
pub struct MemoryCartStorage {
    document: Mutex<Option<Vec<u8>>>,
}

impl MemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with a raw document, which need not be valid.
    #[must_use]
    pub fn with_document(document: impl Into<Vec<u8>>) -> Self {
        Self {
            document: Mutex::new(Some(document.into())),
        }
    }
}

impl CartStorage for MemoryCartStorage {
    async fn load(&self) -> Result<Cart, StorageError> {
        match self.document.lock().await.as_deref() {
            Some(bytes) => serde_json::from_slice(bytes).map_err(StorageError::Corrupt),
            None => Ok(Cart::new()),
        }
    }

    async fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let json = serde_json::to_vec(cart).map_err(StorageError::Serialize)?;
        *self.document.lock().await = Some(json);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.document.lock().await = None;
        Ok(())
    }
}
