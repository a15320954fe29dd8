use actix_web::{web, HttpRequest, HttpResponse};

use crate::dto::auth::MessageResponse;
use crate::handlers::error::{domain_error_response, extract_language, Language};
use crate::middleware::Authenticated;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the bearer token the request was authenticated with and drops
/// its session. A cookie-authenticated request has no token to revoke.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "success": true, "message": "Logged out successfully" }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing, invalid or timed-out credential
pub async fn logout(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: Authenticated,
) -> HttpResponse {
    let lang = extract_language(&req);

    if let Some(token) = auth.token.as_deref() {
        if let Err(error) = state.gate.logout(token) {
            return domain_error_response(&error, lang);
        }
    }

    let message = match lang {
        Language::English => "Logged out successfully",
        Language::Chinese => "登出成功",
    };
    HttpResponse::Ok().json(MessageResponse::new(message))
}
