use std::path::Path;

use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::io;
use crate::storage::{Snapshot, Storage};
use super::generator::TextGenerator;

static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_]+$").expect("valid name regex"));

/// A named, persisted text generator.
///
/// The generator configuration is not part of the stored data: it is
/// supplied each time the dictionary is created or opened.
#[derive(Debug, Clone)]
pub struct Dictionary {
	name: String,
	generator: TextGenerator,
}

impl Dictionary {
	/// Checks that `name` only uses ASCII letters and underscores.
	pub fn validate_name(name: &str) -> Result<()> {
		if NAME.is_match(name) {
			Ok(())
		} else {
			Err(Error::InvalidName(name.to_owned()))
		}
	}

	/// Creates an empty dictionary and stores it right away.
	///
	/// # Errors
	/// - `Error::InvalidName` if the name is not made of `[A-Za-z_]`
	/// - `Error::AlreadyExists` if the storage already holds this name
	pub fn create<S: Storage + ?Sized>(storage: &mut S, name: &str, config: GeneratorConfig) -> Result<Self> {
		Self::validate_name(name)?;
		if storage.contains(name)? {
			return Err(Error::AlreadyExists(name.to_owned()));
		}

		storage.save(name, &Snapshot::empty())?;
		info!("Dictionary '{name}' created");
		Ok(Self { name: name.to_owned(), generator: TextGenerator::new(config) })
	}

	/// Loads the dictionary `name` from `storage`.
	///
	/// # Errors
	/// - `Error::InvalidName` if the name is not made of `[A-Za-z_]`
	/// - `Error::NotFound` if the storage does not hold it
	pub fn open<S: Storage + ?Sized>(storage: &S, name: &str, config: GeneratorConfig) -> Result<Self> {
		Self::validate_name(name)?;
		let generator = storage.load(name)?.restore(config);
		info!("Dictionary '{name}' opened ({} contexts)", generator.len());
		Ok(Self { name: name.to_owned(), generator })
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn generator(&self) -> &TextGenerator {
		&self.generator
	}

	pub fn set_config(&mut self, config: GeneratorConfig) {
		self.generator.set_config(config);
	}

	pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) -> Result<()> {
		storage.save(&self.name, &Snapshot::capture(&self.generator))?;
		info!("Dictionary '{}' saved", self.name);
		Ok(())
	}

	/// Removes the dictionary from `storage`.
	pub fn delete<S: Storage + ?Sized>(self, storage: &mut S) -> Result<()> {
		storage.delete(&self.name)?;
		info!("Dictionary '{}' deleted", self.name);
		Ok(())
	}

	/// Learns from `text`. Returns the number of contexts touched.
	pub fn ingest_text(&mut self, text: &str) -> usize {
		self.generator.ingest(text)
	}

	/// Learns from raw bytes, which must be UTF-8 text.
	///
	/// # Errors
	/// `Error::InvalidInput` if the bytes are not text; nothing is learned then.
	pub fn ingest_bytes(&mut self, bytes: Vec<u8>) -> Result<usize> {
		let text = io::decode_text(bytes)?;
		Ok(self.ingest_text(&text))
	}

	/// Learns from a text file, then stores the updated dictionary.
	pub fn ingest_file<P: AsRef<Path>, S: Storage + ?Sized>(&mut self, path: P, storage: &mut S) -> Result<usize> {
		let text = io::read_text(&path)?;
		let touched = self.ingest_text(&text);
		info!("Dictionary '{}' learned from {} ({touched} contexts)", self.name, path.as_ref().display());
		self.save(storage)?;
		Ok(touched)
	}

	/// Continues the phrase started by `prefix`.
	pub fn generate(&self, prefix: &str) -> Result<String> {
		self.generator.generate(prefix)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::storage::MemoryStorage;

	#[test]
	fn validates_names() {
		for name in ["tolstoy", "War_and_Peace", "_"] {
			assert!(Dictionary::validate_name(name).is_ok(), "{name}");
		}
		for name in ["", "bad name", "abc1", "толстой", "a.b", "../etc"] {
			assert!(matches!(Dictionary::validate_name(name), Err(Error::InvalidName(_))), "{name}");
		}
	}

	#[test]
	fn create_persists_immediately() {
		let mut storage = MemoryStorage::new();
		let dictionary = Dictionary::create(&mut storage, "fresh", GeneratorConfig::default()).unwrap();
		assert!(dictionary.generator().is_empty());
		assert_eq!(storage.list_available().unwrap(), vec!["fresh"]);

		assert!(matches!(
			Dictionary::create(&mut storage, "fresh", GeneratorConfig::default()),
			Err(Error::AlreadyExists(_))
		));
	}

	#[test]
	fn save_and_open_round_trip() {
		let mut storage = MemoryStorage::new();
		let mut dictionary = Dictionary::create(&mut storage, "cats", GeneratorConfig::default()).unwrap();
		dictionary.ingest_text("The cat sat. The cat ran. A dog sat.");
		dictionary.save(&mut storage).unwrap();

		let reopened = Dictionary::open(&storage, "cats", GeneratorConfig::default()).unwrap();
		assert_eq!(reopened.name(), "cats");
		assert_eq!(reopened.generator().ngrams(), dictionary.generator().ngrams());
	}

	#[test]
	fn open_unknown_is_not_found() {
		let storage = MemoryStorage::new();
		assert!(matches!(
			Dictionary::open(&storage, "ghost", GeneratorConfig::default()),
			Err(Error::NotFound(_))
		));
	}

	#[test]
	fn open_rejects_names_leaving_the_folder() {
		let dir = tempfile::tempdir().unwrap();
		let mut outside = crate::storage::FolderStorage::new(dir.path().to_str().unwrap());
		Dictionary::create(&mut outside, "outside", GeneratorConfig::default()).unwrap();

		let inside = crate::storage::FolderStorage::new(dir.path().join("data").to_str().unwrap());
		assert!(matches!(
			Dictionary::open(&inside, "../outside", GeneratorConfig::default()),
			Err(Error::InvalidName(_))
		));
	}

	#[test]
	fn set_config_changes_generation_bound() {
		let mut storage = MemoryStorage::new();
		let mut dictionary = Dictionary::create(&mut storage, "echo", GeneratorConfig::default()).unwrap();
		dictionary.ingest_text("la la la la la la");
		dictionary.set_config(GeneratorConfig { max_generated_word_count: 2, generated_without_dot: 10 });
		assert_eq!(dictionary.generator().config().max_generated_word_count, 2);
		assert_eq!(dictionary.generate("la").unwrap(), "la la la.");
	}

	#[test]
	fn undecodable_bytes_change_nothing() {
		let mut storage = MemoryStorage::new();
		let mut dictionary = Dictionary::create(&mut storage, "cats", GeneratorConfig::default()).unwrap();
		dictionary.ingest_text("the cat sat.");
		let before = dictionary.generator().ngrams().clone();

		assert!(matches!(dictionary.ingest_bytes(vec![b'a', 0xff, b'b']), Err(Error::InvalidInput(_))));
		assert_eq!(dictionary.generator().ngrams(), &before);

		assert_eq!(dictionary.ingest_bytes(b"the dog".to_vec()).unwrap(), 3);
	}

	#[test]
	fn delete_removes_from_storage() {
		let mut storage = MemoryStorage::new();
		let dictionary = Dictionary::create(&mut storage, "cats", GeneratorConfig::default()).unwrap();
		dictionary.delete(&mut storage).unwrap();
		assert!(storage.list_available().unwrap().is_empty());
	}
}
