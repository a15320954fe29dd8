//! Application factory
//!
//! Builds the Actix-web application around an already constructed
//! [`AppState`].

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use crate::middleware::Authentication;
use crate::routes::auth::{
    blacklist_cleanup, blacklist_info, logout, refresh, revoke_all_sessions, session_info,
    sessions, user_blacklisted_tokens,
};
use crate::state::AppState;

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(app_state)
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(web::scope("/api/v1").configure(configure_auth_routes))
        .default_service(web::route().to(not_found))
}

/// Registers the `/auth` scope
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            // Refresh accepts tokens that no longer authenticate
            .route("/refresh", web::post().to(refresh))
            .service(
                web::scope("")
                    .wrap(Authentication::new())
                    .route("/logout", web::post().to(logout))
                    .route("/sessions", web::get().to(sessions))
                    .route("/sessions/revoke-all", web::post().to(revoke_all_sessions))
                    .route("/session/info", web::get().to(session_info))
                    .route("/blacklist/info", web::get().to(blacklist_info))
                    .route("/blacklist/cleanup", web::post().to(blacklist_cleanup))
                    .route("/user/blacklisted-tokens", web::get().to(user_blacklisted_tokens)),
            ),
    );
}

async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "tokengate-api",
        "version": env!("CARGO_PKG_VERSION"),
        "active_sessions": state.gate.sessions().active_count(None),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(tg_shared::errors::ErrorResponse::new(
        tg_shared::errors::error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
