pub mod auth;

pub use auth::{Authenticated, Authentication, CookieSessionResolver};
