use std::collections::HashMap;

use log::debug;

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use super::frequency::{CountTable, FrequencyAnalyzer};
use super::ngram::Ngram;
use super::parser::{TextParser, TERMINATOR};

/// Word-level bigram/trigram model continuing user phrases.
///
/// # Responsibilities
/// - Merge counts of newly ingested text into the context table
/// - Continue a phrase greedily, using the longest known context
/// - Decide when the continuation should end its sentence
///
/// # Invariants
/// - Every key of `ngrams` has one or two words
/// - Each `Ngram` is stored under its own key
#[derive(Debug, Clone)]
pub struct TextGenerator {
	parser: TextParser,
	analyzer: FrequencyAnalyzer,
	config: GeneratorConfig,
	ngrams: HashMap<String, Ngram>,
}

impl TextGenerator {
	/// Creates an empty generator.
	pub fn new(config: GeneratorConfig) -> Self {
		Self::with_ngrams(config, HashMap::new())
	}

	/// Creates a generator over an existing context table.
	pub fn with_ngrams(config: GeneratorConfig, ngrams: HashMap<String, Ngram>) -> Self {
		Self {
			parser: TextParser::new(),
			analyzer: FrequencyAnalyzer::new(),
			config,
			ngrams,
		}
	}

	pub fn config(&self) -> &GeneratorConfig {
		&self.config
	}

	pub fn set_config(&mut self, config: GeneratorConfig) {
		self.config = config;
	}

	/// The context table, keyed by context.
	pub fn ngrams(&self) -> &HashMap<String, Ngram> {
		&self.ngrams
	}

	pub fn get(&self, context: &str) -> Option<&Ngram> {
		self.ngrams.get(context)
	}

	/// Number of known contexts.
	pub fn len(&self) -> usize {
		self.ngrams.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ngrams.is_empty()
	}

	/// Learns from `text` on top of everything learned so far.
	///
	/// Returns the number of contexts touched by the text.
	pub fn ingest(&mut self, text: &str) -> usize {
		let sentences = self.parser.parse(text);
		let deltas = self.analyzer.build_counts(&sentences);
		let touched = deltas.len();
		self.merge_counts(deltas);
		debug!("Ingested {} sentences, {} contexts touched", sentences.len(), touched);
		touched
	}

	/// Merges continuation counts into the context table.
	///
	/// Unknown contexts get a fresh `Ngram`; known ones accumulate the counts.
	pub fn merge_counts(&mut self, deltas: CountTable) {
		for (context, counts) in deltas {
			match self.ngrams.get_mut(&context) {
				Some(existing) => existing.merge(&counts),
				None => {
					let ngram = Ngram::new(&context, counts);
					self.ngrams.insert(context, ngram);
				}
			}
		}
	}

	/// Finds the ngram for the longest known context ending `tokens`.
	fn lookup(&self, tokens: &[String]) -> Option<&Ngram> {
		let trigram = match tokens {
			[.., before_last, last] => self.ngrams.get(&format!("{before_last} {last}")),
			_ => None,
		};
		trigram.or_else(|| self.ngrams.get(tokens.last()?))
	}

	/// Continues the phrase started by `prefix`.
	///
	/// Only the last sentence of `prefix` is continued. New words are chosen
	/// one at a time from the longest known context (two words, then one)
	/// until one of the following happens:
	/// - the sentence terminator is chosen
	/// - `max_generated_word_count` words have been added
	/// - the current context is unknown
	///
	/// After `generated_without_dot` new words, the terminator is chosen as
	/// soon as it is one of the best continuations.
	///
	/// The result is the normalized phrase followed by a single `.`.
	///
	/// # Errors
	/// Returns `Error::InvalidInput` if `prefix` contains no sentence at all.
	pub fn generate(&self, prefix: &str) -> Result<String> {
		let mut tokens = self
			.parser
			.parse(prefix)
			.pop()
			.ok_or_else(|| Error::InvalidInput("the phrase must contain at least one word".to_owned()))?;
		// Drop the terminator closing the prefix
		tokens.pop();

		let mut words_count = 0;
		let mut ended = false;
		while words_count < self.config.max_generated_word_count {
			let Some(ngram) = self.lookup(&tokens) else {
				break;
			};

			let next = if words_count < self.config.generated_without_dot {
				ngram.next_avoiding_terminator()
			} else {
				ngram.next_preferring_terminator()
			};
			let Some(next) = next else {
				break;
			};

			words_count += 1;
			if next == TERMINATOR {
				ended = true;
				break;
			}
			tokens.push(next.to_owned());
		}

		debug!("Generated {} words (sentence ended: {})", words_count, ended);

		let mut phrase = tokens.join(" ");
		phrase.push_str(TERMINATOR);
		Ok(phrase)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::frequency::Counts;

	fn counts(pairs: &[(&str, usize)]) -> Counts {
		pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
	}

	/// Builds a generator from `(context, continuation, count)` triples.
	fn generator(table: &[(&str, &str, usize)]) -> TextGenerator {
		let mut deltas = CountTable::new();
		for (context, token, count) in table {
			deltas.entry(context.to_string()).or_default().insert(token.to_string(), *count);
		}
		let mut generator = TextGenerator::new(GeneratorConfig::default());
		generator.merge_counts(deltas);
		generator
	}

	#[test]
	fn empty_prefix_is_invalid() {
		let generator = generator(&[]);
		for prefix in ["", "   ", "...", "?!"] {
			assert!(matches!(generator.generate(prefix), Err(Error::InvalidInput(_))), "{prefix:?}");
		}
	}

	#[test]
	fn empty_table_returns_prefix() {
		let generator = generator(&[]);
		assert_eq!(generator.generate("x.").unwrap(), "x.");
		assert_eq!(generator.generate("a b c.").unwrap(), "a b c.");
	}

	#[test]
	fn prefix_without_words_is_a_valid_seed() {
		let generator = generator(&[("x", "y", 1)]);
		assert_eq!(generator.generate("42").unwrap(), ".");
	}

	#[test]
	fn one_bigram() {
		let generator = generator(&[("x", "y", 1)]);
		assert_eq!(generator.generate("x").unwrap(), "x y.");
	}

	#[test]
	fn follows_bigrams() {
		let generator = generator(&[("x", "y", 1), ("y", "z", 1)]);
		assert_eq!(generator.generate("x").unwrap(), "x y z.");
		assert_eq!(generator.generate("y").unwrap(), "y z.");
	}

	#[test]
	fn trigram_wins_over_bigram() {
		let generator = generator(&[
			("x", "y", 1),
			("x y", "z", 1),
			("y", "q", 1),
		]);
		let cases = [
			("x", "x y z."),
			("x y", "x y z."),
			("x x", "x x y z."),
			("y x", "y x y z."),
			("y y", "y y q."),
			("y z", "y z."),
			("a b x y", "a b x y z."),
			("a b y", "a b y q."),
			("y", "y q."),
			("X Y", "x y z."),
		];
		for (prefix, expected) in cases {
			assert_eq!(generator.generate(prefix).unwrap(), expected, "{prefix:?}");
		}
	}

	#[test]
	fn chains_trigrams() {
		let generator = generator(&[
			("x", "y", 1),
			("x y", "z", 1),
			("y z", "w", 1),
			("z w", "v", 1),
			("y", "a", 1),
			("z", "b", 1),
		]);
		assert_eq!(generator.generate("x y").unwrap(), "x y z w v.");
	}

	#[test]
	fn continues_only_the_last_sentence() {
		let generator = generator(&[
			("hello", "everybody", 1),
			("everybody", "be", 1),
			("everybody be", "cool", 1),
		]);
		let cases = [
			("x.", "x."),
			("hello", "hello everybody be cool."),
			("hello everybody", "hello everybody be cool."),
			("everybody be", "everybody be cool."),
			("be.", "be."),
			("be cool.", "be cool."),
			("goodbye. hello", "hello everybody be cool."),
		];
		for (prefix, expected) in cases {
			assert_eq!(generator.generate(prefix).unwrap(), expected, "{prefix:?}");
		}
	}

	#[test]
	fn cycle_stops_at_max_word_count() {
		let generator = generator(&[("x", "x", 1), ("y", "x", 1)]);
		let max = generator.config().max_generated_word_count;
		for seed in ["x", "y"] {
			let expected = format!("{seed}{}.", " x".repeat(max));
			assert_eq!(generator.generate(seed).unwrap(), expected);
		}
	}

	#[test]
	fn max_word_count_is_configurable() {
		let mut generator = generator(&[("x", "x", 1)]);
		generator.set_config(GeneratorConfig { max_generated_word_count: 3, generated_without_dot: 10 });
		assert_eq!(generator.generate("x").unwrap(), "x x x x.");

		generator.set_config(GeneratorConfig { max_generated_word_count: 0, generated_without_dot: 10 });
		assert_eq!(generator.generate("x").unwrap(), "x.");
	}

	#[test]
	fn terminator_is_preferred_after_threshold() {
		let generator = generator(&[("x", "x", 2), ("x", ".", 1)]);
		let without_dot = generator.config().generated_without_dot;
		let expected = format!("x{}.", " x".repeat(without_dot));
		for _ in 0..20 {
			assert_eq!(generator.generate("x").unwrap(), expected);
		}
	}

	#[test]
	fn chosen_terminator_ends_generation() {
		let generator = generator(&[("x", "y", 1), ("x y", ".", 1), ("y", "z", 1)]);
		assert_eq!(generator.generate("x").unwrap(), "x y.");
	}

	#[test]
	fn ingest_merges_without_resetting() {
		let mut generator = TextGenerator::new(GeneratorConfig::default());
		assert_eq!(generator.ingest("a b. a b."), 3);
		generator.ingest("a c. a c. a c.");

		let a = generator.get("a").unwrap();
		assert_eq!(a.counts(), &counts(&[("b", 2), ("c", 3)]));
		assert_eq!(a.top(), ["c", "b"]);
		assert_eq!(generator.get("a b").unwrap().counts(), &counts(&[(".", 2)]));
		assert_eq!(generator.generate("a c").unwrap(), "a c.");
	}

	#[test]
	fn merging_nothing_keeps_table() {
		let mut generator = generator(&[("x", "y", 1), ("x y", ".", 3)]);
		let before = generator.ngrams().clone();
		generator.merge_counts(CountTable::new());
		generator.ingest("");
		generator.ingest("... 123");
		assert_eq!(generator.ngrams(), &before);
	}
}
