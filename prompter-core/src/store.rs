//! # Prompt Store
//!
//! This module defines the persisted store document and the storage backend
//! trait.
//!
//! The main components are:
//! - [`StoreBackend`] trait - Defines the interface for loading and saving the
//!   store document
//! - [`StoreDocument`] struct - The whole persisted state: the prompt list and
//!   the global system prompt

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::prompt::Prompt;

/// Process-wide persisted state. The JSON shape of this struct is the durable
/// contract of the store file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDocument {
    pub prompts: Vec<Prompt>,
    #[serde(default)]
    pub system_prompt: String,
}

impl StoreDocument {
    pub fn empty(system_prompt: impl Into<String>) -> Self {
        Self {
            prompts: Vec::new(),
            system_prompt: system_prompt.into(),
        }
    }

    pub fn find(&self, id: &Uuid) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == *id)
    }

    pub fn find_mut(&mut self, id: &Uuid) -> Option<&mut Prompt> {
        self.prompts.iter_mut().find(|p| p.id == *id)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt store document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Backing medium for the store document.
///
/// Implementations own durability; callers follow a read-modify-write cycle:
/// `load` the whole document, mutate it in memory, `save` the whole document.
/// There is no partial update and no caching between calls, so every operation
/// observes the latest persisted state at its start.
pub trait StoreBackend {
    /// Create the backing document if it does not exist yet. Idempotent; an
    /// existing document is never overwritten.
    fn ensure(&self) -> Result<(), StoreError>;

    /// Read the full document. A document missing schema fields is upgraded in
    /// place and the fix persisted before this returns.
    fn load(&self) -> Result<StoreDocument, StoreError>;

    /// Serialize `doc` and overwrite the backing document. A subsequent `load`
    /// must observe either the previous or the new document, never a partial
    /// write.
    fn save(&self, doc: &StoreDocument) -> Result<(), StoreError>;
}
