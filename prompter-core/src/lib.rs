//! # prompter Core
//!
//! This crate provides the core functionality for prompter, a small
//! prompt-management system.
//!
//! prompter stores user-submitted text prompts in a single JSON document,
//! tracks iterative rewrites of each prompt produced by a language-model call,
//! and lets callers rate (thumbs up/down) and comment on prompts.
//!
//! # Modules
//!
//! - [`file_store`] - JSON-file-backed storage for the prompt document
//! - [`llm`] - The completion gateway trait and its OpenAI-compatible adapter
//! - [`prompt`] - Core prompt data structures
//! - [`repository`] - Domain operations over the prompt store
//! - [`store`] - Store document, backend trait and storage errors
//!
//! # Examples
//!
//! ```rust,no_run
//! use prompter_core::file_store::JsonFileStore;
//! use prompter_core::llm::OpenAiGateway;
//! use prompter_core::repository::PromptRepository;
//!
//! let store = JsonFileStore::new("prompts_db.json");
//! let gateway = OpenAiGateway::new("sk-...", "https://api.openai.com/v1");
//! let repository = PromptRepository::new(store, gateway, "gpt-4o-mini")
//!     .expect("failed to open prompt store");
//!
//! let id = repository.create("Summarize today's weather").unwrap();
//! assert_eq!(repository.list().unwrap().len(), 1);
//! let _ = id;
//! ```

pub mod file_store;
pub mod llm;
pub mod prompt;
pub mod repository;
pub mod store;
