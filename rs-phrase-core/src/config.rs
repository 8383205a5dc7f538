use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_MAX_GENERATED_WORD_COUNT: usize = 30;
pub const DEFAULT_GENERATED_WITHOUT_DOT: usize = 10;
pub const DEFAULT_DATA_FOLDER: &str = "data";

/// Tunables of a `TextGenerator`, held per instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
	/// Upper bound on the number of words added to a phrase.
	pub max_generated_word_count: usize,
	/// Number of added words after which the generator tries to end the sentence.
	pub generated_without_dot: usize,
}

impl Default for GeneratorConfig {
	fn default() -> Self {
		Self {
			max_generated_word_count: DEFAULT_MAX_GENERATED_WORD_COUNT,
			generated_without_dot: DEFAULT_GENERATED_WITHOUT_DOT,
		}
	}
}

/// Application settings, stored as a flat TOML file.
///
/// ```toml
/// current_dictionary = "tolstoy"
/// data_folder = "data"
/// max_generated_word_count = 30
/// generated_without_dot = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
	/// Dictionary opened on startup.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub current_dictionary: Option<String>,
	/// Folder holding the dictionaries.
	pub data_folder: String,
	pub max_generated_word_count: usize,
	pub generated_without_dot: usize,
}

impl Default for Config {
	fn default() -> Self {
		let generator = GeneratorConfig::default();
		Self {
			current_dictionary: None,
			data_folder: DEFAULT_DATA_FOLDER.to_owned(),
			max_generated_word_count: generator.max_generated_word_count,
			generated_without_dot: generator.generated_without_dot,
		}
	}
}

impl Config {
	/// Reads the configuration at `path`.
	///
	/// Never fails: a missing or unreadable file gives the defaults, and each
	/// invalid or missing key falls back to its own default.
	pub fn load<P: AsRef<Path>>(path: P) -> Self {
		let path = path.as_ref();
		match fs::read_to_string(path) {
			Ok(contents) => Self::from_toml_str(&contents),
			Err(e) => {
				warn!("Cannot read config {}: {e}, using defaults", path.display());
				Self::default()
			}
		}
	}

	/// Parses a TOML document, validating every key independently.
	pub fn from_toml_str(contents: &str) -> Self {
		let table: toml::Table = match contents.parse() {
			Ok(table) => table,
			Err(e) => {
				warn!("Invalid config: {e}, using defaults");
				return Self::default();
			}
		};

		let defaults = Self::default();
		Self {
			current_dictionary: match table.get("current_dictionary") {
				Some(toml::Value::String(name)) if !name.is_empty() => Some(name.clone()),
				_ => None,
			},
			data_folder: match table.get("data_folder") {
				Some(toml::Value::String(folder)) if !folder.is_empty() => folder.clone(),
				_ => defaults.data_folder,
			},
			max_generated_word_count: Self::positive(&table, "max_generated_word_count", defaults.max_generated_word_count),
			generated_without_dot: Self::positive(&table, "generated_without_dot", defaults.generated_without_dot),
		}
	}

	/// Reads a strictly positive integer, or returns `default`.
	fn positive(table: &toml::Table, key: &str, default: usize) -> usize {
		match table.get(key) {
			None => default,
			Some(toml::Value::Integer(value)) if *value > 0 => match usize::try_from(*value) {
				Ok(value) => value,
				Err(_) => default,
			},
			Some(value) => {
				warn!("Invalid value for {key}: {value}, using {default}");
				default
			}
		}
	}

	/// Writes the configuration at `path`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let contents = toml::to_string(self).map_err(|e| Error::Config(e.to_string()))?;
		fs::write(path, contents)?;
		Ok(())
	}

	/// Generation tunables.
	pub fn generator(&self) -> GeneratorConfig {
		GeneratorConfig {
			max_generated_word_count: self.max_generated_word_count,
			generated_without_dot: self.generated_without_dot,
		}
	}
}
