//! Authentication route handlers
//!
//! This module contains the token lifecycle endpoints:
//! - Token refresh and logout
//! - Session listing, inspection and bulk revocation
//! - Revocation store (blacklist) maintenance

pub mod blacklist;
pub mod logout;
pub mod refresh;
pub mod sessions;

pub use blacklist::{blacklist_cleanup, blacklist_info, user_blacklisted_tokens};
pub use logout::logout;
pub use refresh::refresh;
pub use sessions::{revoke_all_sessions, session_info, sessions};
