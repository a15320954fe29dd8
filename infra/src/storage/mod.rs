//! Durable storage for revoked token identifiers

mod error;
mod file_revocation_store;


pub use error::StorageError;
pub use file_revocation_store::FileRevocationStore;
