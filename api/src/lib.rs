//! # TokenGate API
//!
//! Actix-web adapter over the authentication gate: the authentication
//! middleware, the token lifecycle routes, and the application factory used
//! by the binary and the integration tests.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use app::create_app;
pub use state::AppState;
