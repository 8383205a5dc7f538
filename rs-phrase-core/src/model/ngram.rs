use rand::prelude::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::frequency::{Counts, FrequencyAnalyzer};
use super::parser::TERMINATOR;

/// Continuation statistics of a single context.
///
/// An `Ngram` corresponds to a one- or two-word context (`key`) and stores
/// every continuation observed after it, together with the two best ones.
///
/// ## Responsibilities:
/// - Accumulate continuation occurrences across ingestions
/// - Keep the top-2 cache in sync with the counts
/// - Choose the next token, with or without a preference for ending the sentence
///
/// ## Invariants
/// - `top` is always `FrequencyAnalyzer::top2(&counts)`
/// - Counts never decrease
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Ngram {
	/// Context of the ngram, e.g. `"the"` or `"the quick"`.
	key: String,
	/// Continuations indexed by token.
	/// Example: { "fox" => 3, "." => 1 }
	counts: Counts,
	/// At most two continuations, best first.
	top: Vec<String>,
}

impl Ngram {
	/// Creates an ngram for `key` from already collected counts.
	pub fn new(key: &str, counts: Counts) -> Self {
		let top = FrequencyAnalyzer::new().top2(&counts);
		Self { key: key.to_owned(), counts, top }
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn counts(&self) -> &Counts {
		&self.counts
	}

	/// The cached best continuations, best first.
	pub fn top(&self) -> &[String] {
		&self.top
	}

	/// Adds `delta` occurrences to the current counts and refreshes the cache.
	pub fn merge(&mut self, delta: &Counts) {
		if delta.is_empty() {
			return;
		}
		for (token, occurrence) in delta {
			*self.counts.entry(token.clone()).or_insert(0) += *occurrence;
		}
		self.top = FrequencyAnalyzer::new().top2(&self.counts);
	}

	/// Recomputes the cache, returning `true` if it was stale.
	///
	/// Only needed for ngrams restored from storage.
	pub(crate) fn refresh_top(&mut self) -> bool {
		let top = FrequencyAnalyzer::new().top2(&self.counts);
		if top == self.top {
			return false;
		}
		self.top = top;
		true
	}

	fn contains_terminator(&self) -> bool {
		self.top.iter().any(|token| token == TERMINATOR)
	}

	fn pick_random(&self) -> Option<&str> {
		self.top.choose(&mut rand::rng()).map(String::as_str)
	}

	/// Picks the next token while the sentence should keep going.
	///
	/// If the terminator is among the best continuations, the other one is
	/// returned; the terminator comes back only when it is the sole option.
	/// Otherwise one of the best continuations is drawn uniformly.
	///
	/// Returns `None` if the ngram has no continuation.
	pub fn next_avoiding_terminator(&self) -> Option<&str> {
		if !self.contains_terminator() {
			return self.pick_random();
		}
		self.top
			.iter()
			.find(|token| *token != TERMINATOR)
			.or_else(|| self.top.first())
			.map(String::as_str)
	}

	/// Picks the next token once the sentence should come to an end.
	///
	/// The terminator is returned as soon as it is among the best
	/// continuations, otherwise one of them is drawn uniformly.
	///
	/// Returns `None` if the ngram has no continuation.
	pub fn next_preferring_terminator(&self) -> Option<&str> {
		if self.contains_terminator() {
			return Some(TERMINATOR);
		}
		self.pick_random()
	}
}
