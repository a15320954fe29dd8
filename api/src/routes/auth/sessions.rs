use actix_web::{web, HttpRequest, HttpResponse};
use tg_core::errors::AuthError;

use crate::dto::auth::{
    DataResponse, RevokeAllQuery, RevokeAllResponse, SessionInfoResponse, SessionsResponse,
};
use crate::handlers::error::{auth_error_response, domain_error_response, extract_language, Language};
use crate::middleware::Authenticated;
use crate::state::AppState;

/// Handler for GET /api/v1/auth/sessions
///
/// Lists the caller's unexpired sessions with a redacted token preview.
pub async fn sessions(state: web::Data<AppState>, auth: Authenticated) -> HttpResponse {
    let sessions = state.gate.user_sessions(auth.user_id);
    HttpResponse::Ok().json(DataResponse::new(SessionsResponse { sessions }))
}

/// Handler for POST /api/v1/auth/sessions/revoke-all
///
/// Revokes every session of the caller. With `?keep_current=true` the token
/// making the request survives.
pub async fn revoke_all_sessions(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: Authenticated,
    query: web::Query<RevokeAllQuery>,
) -> HttpResponse {
    let except = if query.keep_current {
        auth.token.as_deref()
    } else {
        None
    };
    let revoked_count = state.gate.revoke_all_sessions(auth.user_id, except);

    let message = match extract_language(&req) {
        Language::English => "All sessions revoked",
        Language::Chinese => "所有会话已撤销",
    };
    HttpResponse::Ok().json(RevokeAllResponse {
        success: true,
        message: message.to_string(),
        revoked_count,
    })
}

/// Handler for GET /api/v1/auth/session/info
///
/// Reports the claims and session state of the bearer token in use.
pub async fn session_info(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: Authenticated,
) -> HttpResponse {
    let lang = extract_language(&req);
    let Some(token) = auth.token.as_deref() else {
        return auth_error_response(&AuthError::Unauthorized, lang);
    };

    match state.gate.token_info(token) {
        Ok(info) => HttpResponse::Ok().json(DataResponse::new(SessionInfoResponse {
            session_info: state.gate.session_info(token),
            user_id: info.user_id,
            username: info.username,
            jti: info.jti,
            exp: info.expires_at,
            iat: info.issued_at,
        })),
        Err(error) => domain_error_response(&error, lang),
    }
}
