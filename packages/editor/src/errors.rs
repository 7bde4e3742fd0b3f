//! Error types for the editor

use folio_document::DocumentError;
use folio_migrate::MigrateError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Invalid document: {0}")]
    Document(#[from] DocumentError),

    #[error("Migration error: {0}")]
    Migrate(#[from] MigrateError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("A save is already in progress")]
    SaveInProgress,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed page record {slug}: {source}")]
    Json {
        slug: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid page slug: {0:?}")]
    InvalidSlug(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type EditorResult<T> = Result<T, EditorError>;
pub type StoreResult<T> = Result<T, StoreError>;
