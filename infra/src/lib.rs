//! # Infrastructure Layer
//!
//! Concrete implementations of the core repository traits:
//!
//! - **Storage**: [`FileRevocationStore`], the durable JSON-file revocation store
//! - **Directory**: [`InMemoryUserDirectory`], an account-status lookup for
//!   deployments without an external user service

pub mod directory;
pub mod storage;

pub use directory::InMemoryUserDirectory;
pub use storage::{FileRevocationStore, StorageError};
