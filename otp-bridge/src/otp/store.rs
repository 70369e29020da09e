//! The shared OTP slot.
//!
//! The slot is a single "last write wins" register. Writers only ever
//! replace the whole value, so there is no read-modify-write and no locking
//! beyond what each backend needs for an atomic replace.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tempfile::NamedTempFile;
use tracing::debug;

use super::extract::OtpCode;
use crate::error::StoreError;

/// Storage for the most recent OTP.
pub trait OtpStore: Send + Sync {
    /// Replace the slot contents with `code`.
    fn put(&self, code: &OtpCode) -> Result<(), StoreError>;

    /// Read the slot. `None` means nothing has been written yet.
    fn get(&self) -> Result<Option<OtpCode>, StoreError>;
}

/// File-backed slot shared with an external reader process.
///
/// Each write goes to its own temp file in the target directory and is then
/// renamed over the target, so readers see either the old or the new code.
#[derive(Debug, Clone)]
pub struct FileOtpStore {
    path: PathBuf,
}

impl FileOtpStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl OtpStore for FileOtpStore {
    fn put(&self, code: &OtpCode) -> Result<(), StoreError> {
        // Must share a filesystem with the target for rename to be atomic.
        let mut tmp = NamedTempFile::new_in(self.dir())?;
        tmp.write_all(code.as_str().as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), "otp_slot_replaced");
        Ok(())
    }

    fn get(&self) -> Result<Option<OtpCode>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        OtpCode::parse(&raw).map(Some).ok_or(StoreError::Corrupt)
    }
}

/// In-process slot.
#[derive(Debug, Default)]
pub struct MemoryOtpStore {
    slot: RwLock<Option<OtpCode>>,
}

impl MemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OtpStore for MemoryOtpStore {
    fn put(&self, code: &OtpCode) -> Result<(), StoreError> {
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(code.clone());
        Ok(())
    }

    fn get(&self) -> Result<Option<OtpCode>, StoreError> {
        let slot = self.slot.read().unwrap_or_else(|e| e.into_inner());
        Ok(slot.clone())
    }
}
