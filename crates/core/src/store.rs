//! Whole-file text storage.
//!
//! [`FileStore`] is the only way the runner touches the filesystem, so tests
//! and dry runs can swap it out.

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::errors::FileError;

/// Read and write whole UTF-8 text files.
pub trait FileStore {
    /// Read the full contents of `path`.
    fn read(&self, path: &Path) -> Result<String, FileError>;

    /// Replace the contents of `path` with `text`.
    fn write(&self, path: &Path, text: &str) -> Result<(), FileError>;
}

/// [`FileStore`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl FileStore for FsStore {
    fn read(&self, path: &Path) -> Result<String, FileError> {
        let bytes = std::fs::read(path).map_err(|e| read_error(path, e))?;
        let text = String::from_utf8(bytes).map_err(|source| FileError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = text.len(), "read file");
        Ok(text)
    }

    fn write(&self, path: &Path, text: &str) -> Result<(), FileError> {
        // Never NotFound: a failed write is an I/O error on a file we just read.
        std::fs::write(path, text).map_err(|source| FileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = text.len(), "wrote file");
        Ok(())
    }
}

fn read_error(path: &Path, source: std::io::Error) -> FileError {
    if source.kind() == ErrorKind::NotFound {
        FileError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        FileError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.tsx");
        FsStore.write(&path, "export {};\r\n").unwrap();
        assert_eq!(FsStore.read(&path).unwrap(), "export {};\r\n");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsStore.read(&dir.path().join("nope.tsx")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G', 0xff, 0xfe]).unwrap();
        let err = FsStore.read(&path).unwrap_err();
        assert!(matches!(err, FileError::Decode { .. }));
    }

    #[test]
    fn test_write_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/page.tsx");
        let err = FsStore.write(&path, "x").unwrap_err();
        assert!(matches!(err, FileError::Io { .. }));
        assert!(!err.is_not_found());
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn test_reading_a_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsStore.read(dir.path()).unwrap_err();
        assert!(matches!(err, FileError::Io { .. }));
    }
}
