//! Services implementing the token lifecycle.

pub mod auth;
pub mod session;
pub mod token;

pub use auth::{AuthGate, AuthGateConfig};
pub use session::{spawn_sweeper, SessionRegistry, SweepReport, SweeperConfig, SweeperHandle};
pub use token::{TokenCodec, TokenCodecConfig};
