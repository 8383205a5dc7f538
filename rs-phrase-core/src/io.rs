use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::error::{Error, Result};

/// Reads a whole text file.
///
/// - Fails with `Error::Io` if the file cannot be read
/// - Fails with `Error::InvalidInput` if the content is not valid UTF-8
pub fn read_text<P: AsRef<Path>>(filename: P) -> Result<String> {
	let bytes = fs::read(filename.as_ref())?;
	decode_text(bytes)
}

/// Decodes raw bytes as UTF-8 text.
pub fn decode_text(bytes: Vec<u8>) -> Result<String> {
	String::from_utf8(bytes).map_err(|e| Error::InvalidInput(format!("text is not valid UTF-8: {e}")))
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists the stems of all files with a given extension in a directory.
///
/// Example: a folder holding `a.dict`, `b.dict` and `c.txt` gives
/// `["a", "b"]` for the `"dict"` extension. The result is sorted.
pub(crate) fn list_stems<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<String>> {
	let mut stems = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(OsStr::new(extension)) {
			if let Some(stem) = path.file_stem() {
				stems.push(stem.to_string_lossy().to_string());
			}
		}
	}

	stems.sort();
	Ok(stems)
}
