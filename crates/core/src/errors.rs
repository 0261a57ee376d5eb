//! Error types for the srcfix core library.
//!
//! Each concern has its own error type derived with `thiserror`. None of them
//! is fatal to a run on its own; the runner turns file and discovery errors
//! into report lines.

use std::path::{Path, PathBuf};

use thiserror::Error;

// ---------------------------------------------------------------------------
// File store errors
// ---------------------------------------------------------------------------

/// Errors from reading or writing a single target file.
///
/// None of these are fatal to a run: the runner reports them per file and
/// moves on to the next path.
#[derive(Debug, Error)]
pub enum FileError {
    /// The target path does not exist.
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The file exists but is not valid UTF-8 text.
    #[error("'{}' is not valid UTF-8: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Any other read or write failure.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FileError {
    /// The path the failure refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path } | Self::Decode { path, .. } | Self::Io { path, .. } => path,
        }
    }

    /// `true` for [`FileError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The failure without the path, for per-file report lines.
    pub fn detail(&self) -> String {
        match self {
            Self::NotFound { .. } => "file not found".to_string(),
            Self::Decode { source, .. } => format!("not valid UTF-8 ({source})"),
            Self::Io { source, .. } => source.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors raised while enumerating target files.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The discovery root does not exist.
    #[error("discovery root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// A directory entry could not be read during the walk.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl DiscoveryError {
    /// The path the failure refers to, when known.
    pub fn path(&self) -> Option<PathBuf> {
        match self {
            Self::RootNotFound(path) => Some(path.clone()),
            Self::Walk(err) => err.path().map(|p| p.to_path_buf()),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = FileError::NotFound {
            path: PathBuf::from("app/page.tsx"),
        };
        assert_eq!(err.to_string(), "file not found: app/page.tsx");
        assert!(err.is_not_found());

        let err = ConfigError::InvalidValue {
            field: "imports.alias".into(),
            detail: "must not be empty".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration value for 'imports.alias': must not be empty"
        );

        let err = DiscoveryError::RootNotFound(PathBuf::from("/missing"));
        assert!(err.to_string().contains("/missing"));
        assert_eq!(err.path(), Some(PathBuf::from("/missing")));
    }

    #[test]
    fn test_decode_error_carries_path() {
        let bad = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err = FileError::Decode {
            path: PathBuf::from("bin.dat"),
            source: bad,
        };
        assert_eq!(err.path(), Path::new("bin.dat"));
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("'bin.dat' is not valid UTF-8"));
    }
}
