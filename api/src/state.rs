//! Shared application state

use actix_web::HttpRequest;
use std::path::PathBuf;
use std::sync::Arc;
use tg_core::repositories::RevocationRepository;
use tg_core::services::AuthGate;

use crate::middleware::CookieSessionResolver;

/// State shared by all workers
pub struct AppState {
    pub gate: AuthGate<dyn RevocationRepository>,
    /// Location of the revocation file, reported by the blacklist info route
    pub blacklist_path: Option<PathBuf>,
    /// Resolver for the ambient session cookie; `None` disables the cookie path
    pub cookie_resolver: Option<Arc<dyn CookieSessionResolver>>,
    pub cookie_name: String,
}

impl AppState {
    pub fn new(gate: AuthGate<dyn RevocationRepository>) -> Self {
        Self {
            gate,
            blacklist_path: None,
            cookie_resolver: None,
            cookie_name: String::from("tokengate_session"),
        }
    }

    pub fn with_blacklist_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.blacklist_path = Some(path.into());
        self
    }

    pub fn with_cookie_resolver(
        mut self,
        cookie_name: impl Into<String>,
        resolver: Arc<dyn CookieSessionResolver>,
    ) -> Self {
        self.cookie_name = cookie_name.into();
        self.cookie_resolver = Some(resolver);
        self
    }

    /// User id behind the session cookie, if the cookie path is enabled
    pub fn cookie_user(&self, req: &HttpRequest) -> Option<i64> {
        let resolver = self.cookie_resolver.as_ref()?;
        let cookie = req.cookie(&self.cookie_name)?;
        resolver.resolve(cookie.value())
    }
}
