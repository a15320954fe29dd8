//! Session tracking
//!
//! [`SessionRegistry`] keeps the in-memory liveness record of every issued
//! token; [`spawn_sweeper`] runs the background task that evicts expired
//! sessions and prunes the revocation store.

mod registry;
mod sweeper;


pub use registry::SessionRegistry;
pub use sweeper::{spawn_sweeper, SweepReport, SweeperConfig, SweeperHandle};
