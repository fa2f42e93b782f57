//! Storage errors
//!
//! I/O failures are classified by what went wrong (permissions, space,
//! plain read/write) so the CLI can print a hint the user can act on.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Direction of a failed file operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Read,
    Write,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoOp::Read => write!(f, "read"),
            IoOp::Write => write!(f, "write"),
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Could not create data directory {path:?}")]
    CreateDataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Permission denied: cannot {op} {path:?}")]
    PermissionDenied {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No space left to save quotes to {path:?}")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure
    #[error("Failed to {op} {path:?}")]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Storage file was not a JSON object of strings; it has been moved aside
    #[error("Storage file {path:?} was unreadable ({details}); moved to {backup_path:?}")]
    Corrupt {
        path: PathBuf,
        backup_path: PathBuf,
        details: String,
    },

    #[error("Could not move {from:?} to {to:?}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode storage value")]
    Encode(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    /// Classify an I/O failure on `path`
    pub fn from_io(op: IoOp, source: io::Error, path: PathBuf) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            StorageError::PermissionDenied { op, path, source }
        } else if op == IoOp::Write && is_out_of_space(&source) {
            StorageError::DiskFull { path, source }
        } else {
            StorageError::Io { op, path, source }
        }
    }

    /// Whether the user can fix this without touching the code
    pub fn is_recoverable(&self) -> bool {
        self.recovery_suggestion().is_some()
    }

    /// A hint to print next to the error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::DiskFull { .. } => Some("Free up disk space and try again."),
            StorageError::PermissionDenied { .. } => {
                Some("Fix the permissions or set QUOTEBOOK_DATA_DIR to a writable directory.")
            }
            StorageError::CreateDataDir { .. } => {
                Some("Check that data_dir points somewhere you can write to.")
            }
            StorageError::Corrupt { .. } => {
                Some("Restore quotes from the .corrupt.backup file or import an export.")
            }
            _ => None,
        }
    }
}

fn is_out_of_space(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    ["no space left", "disk full", "quota exceeded", "not enough space"]
        .iter()
        .any(|needle| msg.contains(needle))
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn io_err(kind: io::ErrorKind, msg: &str) -> io::Error {
        io::Error::new(kind, msg)
    }

    #[test]
    fn test_permission_denied_either_direction() {
        for op in [IoOp::Read, IoOp::Write] {
            let err = StorageError::from_io(
                op,
                io_err(io::ErrorKind::PermissionDenied, "denied"),
                PathBuf::from("/srv/quotes/storage.json"),
            );
            assert!(matches!(err, StorageError::PermissionDenied { .. }));
            assert!(err.is_recoverable());
            assert!(err.to_string().contains(&op.to_string()));
        }
    }

    #[test]
    fn test_out_of_space_only_on_write() {
        let write = StorageError::from_io(
            IoOp::Write,
            io_err(io::ErrorKind::Other, "No space left on device"),
            PathBuf::from("/full"),
        );
        assert!(matches!(write, StorageError::DiskFull { .. }));

        let read = StorageError::from_io(
            IoOp::Read,
            io_err(io::ErrorKind::Other, "No space left on device"),
            PathBuf::from("/full"),
        );
        assert!(matches!(read, StorageError::Io { op: IoOp::Read, .. }));
        assert!(!read.is_recoverable());
    }

    #[test]
    fn test_io_cause_is_not_repeated() {
        let err = StorageError::from_io(
            IoOp::Read,
            io_err(io::ErrorKind::Other, "Is a directory"),
            PathBuf::from("/data/storage.json"),
        );

        assert!(!err.to_string().contains("Is a directory"));
        let chained = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(chained.matches("Is a directory").count(), 1);
    }

    #[test]
    fn test_corrupt_names_backup() {
        let err = StorageError::Corrupt {
            path: PathBuf::from("/data/storage.json"),
            backup_path: PathBuf::from("/data/storage.corrupt.backup"),
            details: "expected value at line 1".to_string(),
        };

        assert!(err.to_string().contains("storage.corrupt.backup"));
        assert!(err.recovery_suggestion().is_some());
    }
}
