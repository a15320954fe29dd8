//! Storage error types

use std::path::PathBuf;
use tg_core::errors::DomainError;
use thiserror::Error;

/// Failures while reading or writing the revocation file
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source} | 文件读写失败")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode revocation document: {0} | 黑名单序列化失败")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to replace {path}: {detail} | 黑名单文件替换失败")]
    Persist { path: PathBuf, detail: String },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(error: StorageError) -> Self {
        DomainError::Storage {
            message: error.to_string(),
        }
    }
}
