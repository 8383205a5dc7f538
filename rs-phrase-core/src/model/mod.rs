//! Top-level module for the phrase generation model.
//!
//! This module provides a word-level n-gram generator, including:
//! - Text parsing into sentences of tokens (`TextParser`)
//! - Continuation counting and ranking (`FrequencyAnalyzer`)
//! - Per-context statistics (`Ngram`)
//! - The generation state machine (`TextGenerator`)
//! - Named, persisted generators (`Dictionary`)

/// Splits text into sentences of lower-cased word tokens.
pub mod parser;

/// Builds continuation counts and extracts the two best continuations.
pub mod frequency;

/// Continuation statistics of one context and the next-token policies.
pub mod ngram;

/// Context table and greedy phrase continuation.
pub mod generator;

/// Named generator with its storage lifecycle.
pub mod dictionary;
