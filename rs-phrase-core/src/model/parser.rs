use once_cell::sync::Lazy;
use regex::Regex;

/// Token closing every parsed sentence.
///
/// It is stored in the context table like any word and can be predicted
/// as a continuation, which is how generation learns to end sentences.
pub const TERMINATOR: &str = ".";

/// Runs of sentence delimiters. Consecutive delimiters form one boundary.
static DELIMITERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?;()]+").expect("valid delimiter regex"));

/// Latin or Cyrillic letters and apostrophes, with one optional trailing comma or colon.
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zа-я']+[,:]?").expect("valid word regex"));

/// Splits raw text into sentences of normalized word tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextParser;

impl TextParser {
	pub fn new() -> Self {
		Self
	}

	/// Parses `text` into a list of sentences.
	///
	/// - Sentences are separated by `.`, `!`, `?`, `;`, `(` and `)`
	/// - Blank sentences are dropped entirely
	/// - Words are lower-cased and may keep a trailing `,` or `:`
	/// - Every kept sentence ends with [`TERMINATOR`], even when no word matched
	pub fn parse(&self, text: &str) -> Vec<Vec<String>> {
		DELIMITERS
			.split(text)
			.map(str::trim)
			.filter(|sentence| !sentence.is_empty())
			.map(|sentence| {
				let lowered = sentence.to_lowercase();
				let mut words: Vec<String> = WORD
					.find_iter(&lowered)
					.map(|m| m.as_str().to_owned())
					.collect();
				words.push(TERMINATOR.to_owned());
				words
			})
			.collect()
	}
}
