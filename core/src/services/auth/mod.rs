//! Authentication gate
//!
//! The request-time facade over the token codec, the session registry and
//! the revocation store. Surrounding layers authenticate requests and manage
//! token lifecycles only through [`AuthGate`].

mod config;
mod gate;


pub use config::AuthGateConfig;
pub use gate::AuthGate;
