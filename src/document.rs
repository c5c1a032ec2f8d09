//! `.ifamily` document files.
//!
//! A document is one top-level value in canonical notation, stored as UTF-8
//! text. Both operations refuse paths that do not end in [`EXTENSION`].
//! Writes replace the whole file; there is no locking, so concurrent
//! writers to one path race and the last one wins.

use crate::{DecodeOptions, Error, Notation, Result, Value};
use std::fs;
use std::path::Path;

/// The reserved document extension.
pub const EXTENSION: &str = ".ifamily";

fn check_extension(path: &Path) -> Result<()> {
    let display = path.to_string_lossy();
    if display.ends_with(EXTENSION) {
        Ok(())
    } else {
        Err(Error::invalid_path(&display, EXTENSION))
    }
}

/// Writes `value` in canonical notation to `path`, replacing any existing content.
///
/// # Errors
///
/// [`Error::InvalidPath`] if `path` lacks the `.ifamily` extension,
/// [`Error::Io`] if the file cannot be written.
pub fn write_document(value: &Value, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    check_extension(path)?;

    let text = crate::encode(value, Notation::Canonical)?;
    fs::write(path, text.as_bytes())
        .map_err(|e| Error::io(&path.to_string_lossy(), &e.to_string()))?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "wrote document");
    Ok(())
}

/// Reads and decodes the document at `path`.
///
/// Surrounding whitespace is trimmed before decoding.
///
/// # Errors
///
/// [`Error::InvalidPath`] if `path` lacks the `.ifamily` extension,
/// [`Error::Io`] if the file cannot be read, and any decoding error.
pub fn read_document(path: impl AsRef<Path>) -> Result<Value> {
    read_document_with_options(path, &DecodeOptions::default())
}

/// Like [`read_document`], with explicit decoder options.
pub fn read_document_with_options(
    path: impl AsRef<Path>,
    options: &DecodeOptions,
) -> Result<Value> {
    let path = path.as_ref();
    check_extension(path)?;

    let text = fs::read_to_string(path)
        .map_err(|e| Error::io(&path.to_string_lossy(), &e.to_string()))?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read document");
    crate::decode_with_options(text.trim(), options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_check() {
        assert!(check_extension(Path::new("people/person.ifamily")).is_ok());
        assert!(check_extension(Path::new("person.txt")).is_err());
        assert!(check_extension(Path::new("person.ifamily.bak")).is_err());
        assert!(check_extension(Path::new("ifamily")).is_err());
    }

    #[test]
    fn test_bad_extension_fails_before_touching_disk() {
        let err = read_document("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_document(dir.path().join("absent.ifamily")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
