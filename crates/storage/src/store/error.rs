#![forbid(unsafe_code)]

use chanlist_core::ChannelHandle;
use std::path::PathBuf;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    MissingFile(PathBuf),
    InvalidConfig(&'static str),
    UnexpectedSchema {
        table: &'static str,
    },
    WriteFailed {
        handle: ChannelHandle,
        source: rusqlite::Error,
    },
    BackupFailed(std::io::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::MissingFile(path) => write!(f, "channel database not found: {}", path.display()),
            Self::InvalidConfig(message) => write!(f, "invalid config: {message}"),
            Self::UnexpectedSchema { table } => {
                write!(f, "unexpected schema (missing table={table})")
            }
            Self::WriteFailed { handle, source } => {
                write!(f, "save rolled back (handle={handle}): {source}")
            }
            Self::BackupFailed(err) => write!(f, "backup copy failed after commit: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) | Self::BackupFailed(err) => Some(err),
            Self::Sql(err) | Self::WriteFailed { source: err, .. } => Some(err),
            Self::MissingFile(_) | Self::InvalidConfig(_) | Self::UnexpectedSchema { .. } => {
                None
            }
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}
