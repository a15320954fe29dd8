//! Token codec module
//!
//! Issues, verifies, decodes and refreshes HMAC-signed bearer tokens. The
//! codec is stateless apart from its keys; revocation is checked against a
//! [`RevocationRepository`](crate::repositories::RevocationRepository) passed
//! in by the caller.

mod codec;
mod config;

#[cfg(test)]
mod tests;

pub use codec::TokenCodec;
pub use config::TokenCodecConfig;
