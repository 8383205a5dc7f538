use std::io;

use thiserror::Error;

/// Errors reported by the phrase generation core.
///
/// Every error is local to the call that produced it: the model is left
/// untouched and the caller is free to retry with other input.
#[derive(Debug, Error)]
pub enum Error {
	/// The input cannot be used (empty prefix, undecodable text, ...).
	#[error("invalid input: {0}")]
	InvalidInput(String),
	/// The requested dictionary does not exist or cannot be read back.
	#[error("dictionary not found: {0}")]
	NotFound(String),
	/// The dictionary name does not match `[A-Za-z_]+`.
	#[error("invalid dictionary name: '{0}'")]
	InvalidName(String),
	#[error("dictionary already exists: {0}")]
	AlreadyExists(String),
	#[error("no dictionary is open")]
	NoDictionaryOpen,
	/// The configuration cannot be written.
	#[error("configuration error: {0}")]
	Config(String),
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),
	#[error("serialization error: {0}")]
	Serialization(#[from] postcard::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl From<tempfile::PersistError> for Error {
	fn from(e: tempfile::PersistError) -> Self {
		Error::Io(e.error)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_names_the_offending_value() {
		assert_eq!(Error::NotFound("tolstoy".into()).to_string(), "dictionary not found: tolstoy");
		assert_eq!(Error::InvalidName("a b".into()).to_string(), "invalid dictionary name: 'a b'");
	}

	#[test]
	fn io_errors_keep_their_source() {
		let err: Error = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
		assert!(std::error::Error::source(&err).is_some());
		assert!(matches!(err, Error::Io(_)));
	}

	#[test]
	fn postcard_errors_convert() {
		let err: Error = postcard::from_bytes::<u32>(&[]).unwrap_err().into();
		assert!(matches!(err, Error::Serialization(_)));
		assert!(err.to_string().starts_with("serialization error: "));
	}
}
