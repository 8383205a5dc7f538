use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::io;
use crate::model::generator::TextGenerator;
use crate::model::ngram::Ngram;

/// Version written in every snapshot. Other versions are not read back.
pub const SNAPSHOT_VERSION: u16 = 1;

/// File extension of dictionaries stored by `FolderStorage`.
pub const DICTIONARY_EXTENSION: &str = "dict";

/// Serialized form of a dictionary: its full context table.
///
/// Each ngram keeps its counts and its cached top-2, so a restored
/// dictionary is equal to the saved one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
	version: u16,
	ngrams: HashMap<String, Ngram>,
}

impl Snapshot {
	/// Captures the context table of `generator`.
	pub fn capture(generator: &TextGenerator) -> Self {
		Self { version: SNAPSHOT_VERSION, ngrams: generator.ngrams().clone() }
	}

	/// Snapshot of an empty dictionary.
	pub fn empty() -> Self {
		Self { version: SNAPSHOT_VERSION, ngrams: HashMap::new() }
	}

	/// Rebuilds a generator from the snapshot.
	///
	/// Cached top-2 lists that disagree with their counts are recomputed.
	pub fn restore(self, config: GeneratorConfig) -> TextGenerator {
		let mut ngrams = self.ngrams;
		for (context, ngram) in ngrams.iter_mut() {
			if ngram.refresh_top() {
				warn!("Stale top-2 cache for context '{context}' recomputed");
			}
		}
		TextGenerator::with_ngrams(config, ngrams)
	}

	/// Encodes the snapshot with `postcard`.
	pub fn encode(&self) -> Result<Vec<u8>> {
		Ok(postcard::to_stdvec(self)?)
	}

	/// Decodes a snapshot stored under `name`.
	///
	/// Unreadable data and unknown versions are reported as `Error::NotFound`.
	pub fn decode(name: &str, bytes: &[u8]) -> Result<Self> {
		let snapshot: Self = postcard::from_bytes(bytes).map_err(|e| {
			warn!("Dictionary '{name}' cannot be decoded: {e}");
			Error::NotFound(name.to_owned())
		})?;
		if snapshot.version != SNAPSHOT_VERSION {
			warn!("Dictionary '{name}' has unsupported version {}", snapshot.version);
			return Err(Error::NotFound(name.to_owned()));
		}
		Ok(snapshot)
	}
}

/// Where dictionaries live between sessions.
pub trait Storage {
	/// Names of all stored dictionaries, sorted.
	fn list_available(&self) -> Result<Vec<String>>;

	/// Loads the dictionary `name`.
	///
	/// # Errors
	/// `Error::NotFound` if it does not exist or cannot be decoded.
	fn load(&self, name: &str) -> Result<Snapshot>;

	/// Stores `snapshot` as `name`, replacing any previous version.
	fn save(&mut self, name: &str, snapshot: &Snapshot) -> Result<()>;

	/// Removes the dictionary `name`.
	///
	/// # Errors
	/// `Error::NotFound` if it does not exist.
	fn delete(&mut self, name: &str) -> Result<()>;

	fn contains(&self, name: &str) -> Result<bool> {
		Ok(self.list_available()?.iter().any(|n| n == name))
	}
}

/// Stores each dictionary as a `<name>.dict` file in one folder.
///
/// Writes go to a temporary file first, which then replaces the target, so
/// an interrupted save never leaves a truncated dictionary behind.
#[derive(Debug, Clone)]
pub struct FolderStorage {
	folder: PathBuf,
}

impl FolderStorage {
	/// Creates a storage over `folder`. `"."` means the current directory.
	///
	/// The folder is created on the first save.
	pub fn new(folder: &str) -> Self {
		Self { folder: io::normalize_folder(folder) }
	}

	fn path_of(&self, name: &str) -> PathBuf {
		self.folder.join(format!("{name}.{DICTIONARY_EXTENSION}"))
	}
}

impl Storage for FolderStorage {
	fn list_available(&self) -> Result<Vec<String>> {
		if !self.folder.is_dir() {
			return Ok(Vec::new());
		}
		io::list_stems(&self.folder, DICTIONARY_EXTENSION)
	}

	fn load(&self, name: &str) -> Result<Snapshot> {
		let path = self.path_of(name);
		let bytes = match fs::read(&path) {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(Error::NotFound(name.to_owned())),
			Err(e) => return Err(e.into()),
		};
		debug!("Read {} bytes from {}", bytes.len(), path.display());
		Snapshot::decode(name, &bytes)
	}

	fn save(&mut self, name: &str, snapshot: &Snapshot) -> Result<()> {
		fs::create_dir_all(&self.folder)?;
		let bytes = snapshot.encode()?;

		let mut temp_file = NamedTempFile::new_in(&self.folder)?;
		temp_file.write_all(&bytes)?;
		temp_file.as_file().sync_all()?;
		temp_file.persist(self.path_of(name))?;

		debug!("Wrote {} bytes for dictionary '{name}'", bytes.len());
		Ok(())
	}

	fn delete(&mut self, name: &str) -> Result<()> {
		match fs::remove_file(self.path_of(name)) {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::NotFound(name.to_owned())),
			Err(e) => Err(e.into()),
		}
	}
}

/// Keeps encoded dictionaries in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
	dictionaries: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores raw bytes under `name`, bypassing encoding.
	pub fn insert_raw(&mut self, name: &str, bytes: Vec<u8>) {
		self.dictionaries.insert(name.to_owned(), bytes);
	}
}

impl Storage for MemoryStorage {
	fn list_available(&self) -> Result<Vec<String>> {
		let mut names: Vec<String> = self.dictionaries.keys().cloned().collect();
		names.sort();
		Ok(names)
	}

	fn load(&self, name: &str) -> Result<Snapshot> {
		let bytes = self.dictionaries.get(name).ok_or_else(|| Error::NotFound(name.to_owned()))?;
		Snapshot::decode(name, bytes)
	}

	fn save(&mut self, name: &str, snapshot: &Snapshot) -> Result<()> {
		self.dictionaries.insert(name.to_owned(), snapshot.encode()?);
		Ok(())
	}

	fn delete(&mut self, name: &str) -> Result<()> {
		self.dictionaries
			.remove(name)
			.map(|_| ())
			.ok_or_else(|| Error::NotFound(name.to_owned()))
	}
}
