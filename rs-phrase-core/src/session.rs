use std::path::Path;

use log::{info, warn};

use crate::config::{Config, GeneratorConfig};
use crate::error::{Error, Result};
use crate::model::dictionary::Dictionary;
use crate::storage::Storage;

/// One user working with at most one open dictionary.
///
/// # Responsibilities
/// - Reopen the dictionary remembered in the configuration
/// - Create, open and delete dictionaries by name
/// - Route ingestion and generation to the open dictionary
///
/// # Invariants
/// - `config.current_dictionary` names the open dictionary, if any
#[derive(Debug)]
pub struct Session<S: Storage> {
	storage: S,
	config: Config,
	current: Option<Dictionary>,
}

impl<S: Storage> Session<S> {
	/// Starts a session, reopening `config.current_dictionary` when it exists.
	///
	/// A remembered dictionary that is missing or unreadable is forgotten.
	pub fn start(storage: S, mut config: Config) -> Result<Self> {
		let current = match config.current_dictionary.take() {
			Some(name) if Dictionary::validate_name(&name).is_err() => {
				warn!("Remembered dictionary name '{name}' is invalid");
				None
			}
			Some(name) if storage.contains(&name)? => match Dictionary::open(&storage, &name, config.generator()) {
				Ok(dictionary) => Some(dictionary),
				Err(Error::NotFound(_)) => {
					warn!("Dictionary '{name}' cannot be reopened");
					None
				}
				Err(e) => return Err(e),
			},
			Some(name) => {
				warn!("Dictionary '{name}' no longer exists");
				None
			}
			None => None,
		};

		config.current_dictionary = current.as_ref().map(|d| d.name().to_owned());
		Ok(Self { storage, config, current })
	}

	/// The configuration, with the open dictionary remembered.
	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn storage(&self) -> &S {
		&self.storage
	}

	/// Names of all stored dictionaries, sorted.
	pub fn available(&self) -> Result<Vec<String>> {
		self.storage.list_available()
	}

	pub fn current_name(&self) -> Option<&str> {
		self.current.as_ref().map(Dictionary::name)
	}

	pub fn current(&self) -> Option<&Dictionary> {
		self.current.as_ref()
	}

	fn set_current(&mut self, dictionary: Option<Dictionary>) {
		self.config.current_dictionary = dictionary.as_ref().map(|d| d.name().to_owned());
		self.current = dictionary;
	}

	fn current_mut(&mut self) -> Result<&mut Dictionary> {
		self.current.as_mut().ok_or(Error::NoDictionaryOpen)
	}

	/// Opens the dictionary `name`. Does nothing if it is already open.
	pub fn open(&mut self, name: &str) -> Result<()> {
		if self.current_name() == Some(name) {
			return Ok(());
		}
		let dictionary = Dictionary::open(&self.storage, name, self.config.generator())?;
		self.set_current(Some(dictionary));
		Ok(())
	}

	/// Creates an empty dictionary `name` and opens it.
	pub fn create(&mut self, name: &str) -> Result<()> {
		let dictionary = Dictionary::create(&mut self.storage, name, self.config.generator())?;
		self.set_current(Some(dictionary));
		Ok(())
	}

	/// Deletes the open dictionary, then opens the first remaining one.
	///
	/// Returns the name of the newly opened dictionary, if any.
	pub fn delete_current(&mut self) -> Result<Option<String>> {
		let dictionary = self.current.take().ok_or(Error::NoDictionaryOpen)?;
		if let Err(e) = self.storage.delete(dictionary.name()) {
			// Still stored, so it stays open
			self.current = Some(dictionary);
			return Err(e);
		}
		info!("Dictionary '{}' deleted", dictionary.name());
		self.config.current_dictionary = None;

		if let Some(next) = self.storage.list_available()?.into_iter().next() {
			self.open(&next)?;
			info!("Switched to dictionary '{next}'");
			return Ok(Some(next));
		}
		Ok(None)
	}

	/// Learns from a text file and stores the open dictionary.
	pub fn ingest_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
		let dictionary = self.current.as_mut().ok_or(Error::NoDictionaryOpen)?;
		dictionary.ingest_file(path, &mut self.storage)
	}

	/// Learns from `text` and stores the open dictionary.
	pub fn ingest_text(&mut self, text: &str) -> Result<usize> {
		let touched = self.current_mut()?.ingest_text(text);
		self.save()?;
		Ok(touched)
	}

	/// Stores the open dictionary.
	pub fn save(&mut self) -> Result<()> {
		let dictionary = self.current.as_ref().ok_or(Error::NoDictionaryOpen)?;
		dictionary.save(&mut self.storage)
	}

	/// Replaces the generation tunables, for the open dictionary too.
	pub fn set_generator_config(&mut self, generator: GeneratorConfig) {
		self.config.max_generated_word_count = generator.max_generated_word_count;
		self.config.generated_without_dot = generator.generated_without_dot;
		if let Some(dictionary) = self.current.as_mut() {
			dictionary.set_config(generator);
		}
	}

	/// Continues `prefix` with the open dictionary.
	pub fn generate(&self, prefix: &str) -> Result<String> {
		self.current.as_ref().ok_or(Error::NoDictionaryOpen)?.generate(prefix)
	}
}
