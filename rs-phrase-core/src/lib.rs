//! Word-level n-gram phrase continuation library.
//!
//! This crate provides an incremental bigram/trigram text generator including:
//! - Sentence and word parsing with an explicit sentence terminator
//! - Continuation counting and top-2 ranking per context
//! - Greedy phrase continuation with a sentence-ending policy
//! - Named dictionaries persisted through a pluggable storage
//! - A session keeping one dictionary open, driven by a TOML configuration

/// Core n-gram models and generation logic.
pub mod model;

/// Configuration file and generator tunables.
pub mod config;

/// Persistence of dictionaries (versioned snapshots).
pub mod storage;

/// Session flow: one open dictionary at a time.
pub mod session;

/// Error type shared by the whole crate.
pub mod error;

/// I/O utilities (text loading, folder helpers).
pub mod io;

pub use config::{Config, GeneratorConfig};
pub use error::{Error, Result};
pub use model::dictionary::Dictionary;
pub use model::generator::TextGenerator;
pub use session::Session;
pub use storage::{FolderStorage, MemoryStorage, Snapshot, Storage};
