use actix_web::{web, HttpRequest, HttpResponse};
use tg_core::errors::AuthError;
use tracing::debug;

use crate::dto::auth::{DataResponse, RefreshResponse};
use crate::handlers::error::{auth_error_response, domain_error_response, extract_language};
use crate::middleware::auth::bearer_token;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a token that is within the refresh window of its expiry for a
/// new one. The presented token is revoked.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {token}
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "data": { "token": "...", "expires_in": 3600, "expires_at": "..." }
/// }
/// ```
///
/// ## Errors
/// - 401 UNAUTHORIZED: Missing Authorization header
/// - 401 INVALID_TOKEN: Bad token, revoked, or outside the refresh window
pub async fn refresh(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let lang = extract_language(&req);

    let Some(token) = bearer_token(&req) else {
        return auth_error_response(&AuthError::Unauthorized, lang);
    };

    match state.gate.refresh(&token) {
        Ok(issued) => HttpResponse::Ok().json(DataResponse::new(RefreshResponse {
            expires_in: issued.expires_in(),
            expires_at: issued.expires_at,
            token: issued.token,
        })),
        Err(error) => {
            debug!(error = %error, "Token refresh failed");
            domain_error_response(&error, lang)
        }
    }
}
