use std::cmp::Ordering;
use std::collections::HashMap;

/// Occurrences of each continuation observed after one context.
///
/// Example: `{ "dog" => 3, "." => 1 }`
pub type Counts = HashMap<String, usize>;

/// Continuation counts indexed by context (`"word"` or `"word word"`).
pub type CountTable = HashMap<String, Counts>;

/// Builds continuation counts from parsed sentences and ranks continuations.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrequencyAnalyzer;

impl FrequencyAnalyzer {
	pub fn new() -> Self {
		Self
	}

	/// Counts every bigram and trigram transition of `sentences`.
	///
	/// For each position `i` of a sentence:
	/// - the one-token context `t[i]` is followed by `t[i + 1]`
	/// - the two-token context `"t[i] t[i + 1]"` is followed by `t[i + 2]`
	///
	/// Transitions never cross sentence boundaries, but counts from all
	/// sentences accumulate into the same table.
	pub fn build_counts(&self, sentences: &[Vec<String>]) -> CountTable {
		let mut table = CountTable::new();

		for tokens in sentences {
			for (i, pair) in tokens.windows(2).enumerate() {
				*table
					.entry(pair[0].clone())
					.or_default()
					.entry(pair[1].clone())
					.or_insert(0) += 1;

				if let Some(next) = tokens.get(i + 2) {
					let context = format!("{} {}", pair[0], pair[1]);
					*table.entry(context).or_default().entry(next.clone()).or_insert(0) += 1;
				}
			}
		}

		table
	}

	/// Returns the two best continuations of `counts`, best first.
	///
	/// A continuation ranks higher when its count is higher; equal counts are
	/// ordered lexicographically, smallest first. The result is empty when no
	/// continuation is known and a singleton when only one is.
	pub fn top2(&self, counts: &Counts) -> Vec<String> {
		let mut first: Option<(&str, usize)> = None;
		let mut second: Option<(&str, usize)> = None;

		for (token, &count) in counts {
			let candidate = (token.as_str(), count);
			if first.is_none_or(|best| Self::ranks_before(candidate, best)) {
				second = first;
				first = Some(candidate);
			} else if second.is_none_or(|runner_up| Self::ranks_before(candidate, runner_up)) {
				second = Some(candidate);
			}
		}

		first
			.into_iter()
			.chain(second)
			.map(|(token, _)| token.to_owned())
			.collect()
	}

	/// Total order: higher count first, then smaller token first.
	fn ranks_before(a: (&str, usize), b: (&str, usize)) -> bool {
		match a.1.cmp(&b.1) {
			Ordering::Greater => true,
			Ordering::Less => false,
			Ordering::Equal => a.0 < b.0,
		}
	}
}
