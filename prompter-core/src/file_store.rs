//! # File Store
//!
//! This module provides functionality for persisting the prompt store document
//! on the local filesystem as a single pretty-printed JSON file.
//!
//! The main component of this module is the [`JsonFileStore`] struct, which
//! implements the [`StoreBackend`] trait. The whole document is read and
//! rewritten on every operation, which keeps the format human-inspectable at
//! the cost of O(total size) per mutation.
//!
//! # Examples
//!
//! ```rust
//! use prompter_core::file_store::JsonFileStore;
//! use prompter_core::store::StoreBackend;
//! use tempfile::TempDir;
//!
//! let temp_dir = TempDir::new().unwrap();
//! let store = JsonFileStore::new(temp_dir.path().join("prompts_db.json"));
//!
//! store.ensure().expect("Failed to seed store");
//! let doc = store.load().expect("Failed to load store");
//! assert!(doc.prompts.is_empty());
//! ```

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tempfile::NamedTempFile;

use crate::prompt::Prompt;
use crate::store::{StoreBackend, StoreDocument, StoreError};

/// On-disk shape of the document, with `system_prompt` kept optional so that
/// a pre-upgrade file can be told apart from one holding an empty string.
#[derive(Deserialize)]
struct RawDocument {
    prompts: Vec<Prompt>,
    system_prompt: Option<String>,
}

/// A JSON file holding the whole prompt store document.
pub struct JsonFileStore {
    /// Path of the backing JSON file.
    pub path: PathBuf,
    /// Value `system_prompt` is seeded or back-filled with.
    pub default_system_prompt: String,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            default_system_prompt: String::new(),
        }
    }

    pub fn with_default_system_prompt(
        path: impl Into<PathBuf>,
        default_system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            default_system_prompt: default_system_prompt.into(),
        }
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Writes `doc` next to the target file, then renames it into place so a
    /// concurrent `load` never observes a half-written document.
    fn write_document(&self, doc: &StoreDocument) -> Result<(), StoreError> {
        let dir = self.parent_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(tmp.as_file(), doc)?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl StoreBackend for JsonFileStore {
    /// Seeds the file with an empty document if it does not exist yet.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the file already existed or was created.
    /// * `StoreError::Io` - If the file or its parent directory could not be
    ///   created.
    fn ensure(&self) -> Result<(), StoreError> {
        if self.path.exists() {
            return Ok(());
        }
        self.write_document(&StoreDocument::empty(&self.default_system_prompt))
    }

    /// Reads the full document from disk.
    ///
    /// A document whose top level lacks `system_prompt`, or holds an empty one
    /// while this store is configured with a non-empty default, is upgraded to
    /// the default and the fix is persisted before returning.
    ///
    /// # Returns
    ///
    /// * `Ok(StoreDocument)` - The (possibly upgraded) document.
    /// * `StoreError::Io` - If the file could not be read.
    /// * `StoreError::Corrupt` - If the content does not parse as the expected
    ///   structure.
    fn load(&self) -> Result<StoreDocument, StoreError> {
        let content = fs::read_to_string(&self.path)?;
        let raw: RawDocument = serde_json::from_str(&content)?;

        let needs_upgrade = match &raw.system_prompt {
            None => true,
            Some(s) => s.is_empty() && !self.default_system_prompt.is_empty(),
        };

        let mut doc = StoreDocument {
            prompts: raw.prompts,
            system_prompt: raw.system_prompt.unwrap_or_default(),
        };
        if needs_upgrade {
            doc.system_prompt = self.default_system_prompt.clone();
            self.save(&doc)?;
        }
        Ok(doc)
    }

    fn save(&self, doc: &StoreDocument) -> Result<(), StoreError> {
        self.write_document(doc)
    }
}
