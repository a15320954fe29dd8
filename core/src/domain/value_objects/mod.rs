//! Value objects representing immutable domain concepts.

pub mod credential;
pub mod identity;

// Re-export commonly used types
pub use credential::{CookieCredential, Credential, TokenCredential};
pub use identity::{AuthMethod, Identity};
