use actix_web::{web, HttpRequest, HttpResponse};
use tracing::info;

use crate::dto::auth::{
    BlacklistCleanupResponse, BlacklistInfoResponse, DataResponse, UserBlacklistedTokensResponse,
};
use crate::handlers::error::{domain_error_response, extract_language};
use crate::middleware::Authenticated;
use crate::state::AppState;

/// Handler for GET /api/v1/auth/blacklist/info
pub async fn blacklist_info(state: web::Data<AppState>, _auth: Authenticated) -> HttpResponse {
    HttpResponse::Ok().json(DataResponse::new(BlacklistInfoResponse {
        total_blacklisted: state.gate.revocations().count(),
        file_path: state
            .blacklist_path
            .as_ref()
            .map(|path| path.display().to_string()),
    }))
}

/// Handler for POST /api/v1/auth/blacklist/cleanup
///
/// Prunes revocations past their retention horizon.
pub async fn blacklist_cleanup(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: Authenticated,
) -> HttpResponse {
    let revocations = state.gate.revocations();

    match revocations.cleanup() {
        Ok(removed_count) => {
            info!(user_id = auth.user_id, removed_count, "Manual revocation cleanup");
            HttpResponse::Ok().json(DataResponse::new(BlacklistCleanupResponse {
                removed_count,
                remaining_count: revocations.count(),
            }))
        }
        Err(error) => domain_error_response(&error, extract_language(&req)),
    }
}

/// Handler for GET /api/v1/auth/user/blacklisted-tokens
///
/// Lists the caller's revoked tokens.
pub async fn user_blacklisted_tokens(
    state: web::Data<AppState>,
    auth: Authenticated,
) -> HttpResponse {
    let revocations = state.gate.revocations();
    HttpResponse::Ok().json(DataResponse::new(UserBlacklistedTokensResponse {
        tokens: revocations.entries_for_user(auth.user_id),
        total_blacklisted: revocations.count(),
    }))
}
