//! Authentication middleware for protecting API endpoints.
//!
//! Resolves the request credential (bearer token first, session cookie as a
//! fallback), runs it through the authentication gate held in [`AppState`],
//! and injects the resulting [`Identity`] into the request extensions.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};
use tg_core::domain::value_objects::{Credential, Identity};
use tg_core::errors::AuthError;
use tracing::{debug, error};

use crate::dto::{ErrorResponse, ErrorResponseExt};
use crate::handlers::error::{auth_error_response, auth_error_status, extract_language, Language};
use crate::state::AppState;

/// Resolves the ambient session cookie to a user id
///
/// Implemented by whatever layer owns the cookie session. Returning `None`
/// means the cookie does not identify a logged-in user.
pub trait CookieSessionResolver: Send + Sync {
    fn resolve(&self, cookie_value: &str) -> Option<i64>;
}

/// Authentication middleware factory
#[derive(Debug, Clone, Copy, Default)]
pub struct Authentication;

impl Authentication {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Authentication middleware service
pub struct AuthenticationMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let lang = extract_language(req.request());

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                error!("Authentication middleware mounted without application state");
                let response = ErrorResponse::new(
                    tg_shared::errors::error_codes::INTERNAL_ERROR,
                    "Authentication is not configured",
                )
                .to_response(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
                return Err(InternalError::from_response("authentication not configured", response).into());
            };

            let bearer = extract_bearer_token(&req);
            let cookie_user = match bearer {
                Some(_) => None,
                None => state.cookie_user(req.request()),
            };
            let credential = Credential::from_parts(bearer.as_deref(), cookie_user);

            match state.gate.authenticate(credential).await {
                Ok(identity) => {
                    debug!(
                        user_id = identity.user_id,
                        auth_method = %identity.auth_method,
                        "Request authenticated"
                    );
                    req.extensions_mut().insert(identity);
                    service.call(req).await
                }
                Err(e) => Err(auth_error(e, lang)),
            }
        })
    }
}

fn auth_error(error: AuthError, lang: Language) -> Error {
    let response: HttpResponse = auth_error_response(&error, lang);
    debug!(
        error_code = error.code(),
        status = auth_error_status(&error).as_u16(),
        "Request rejected"
    );
    InternalError::from_response(error, response).into()
}

/// Extracts the bearer token from the Authorization header
pub fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    bearer_token(req.request())
}

pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    Credential::bearer_from_header(value).map(str::to_string)
}

/// Extractor for the identity established by [`Authentication`]
#[derive(Debug, Clone)]
pub struct Authenticated(pub Identity);

impl Authenticated {
    pub fn into_inner(self) -> Identity {
        self.0
    }
}

impl std::ops::Deref for Authenticated {
    type Target = Identity;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<Identity>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| auth_error(AuthError::Unauthorized, extract_language(req)));

        ready(result)
    }
}
