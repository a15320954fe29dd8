//! Mapping of core errors onto HTTP responses

use actix_web::{
    http::{header, StatusCode},
    HttpRequest, HttpResponse,
};
use tg_core::errors::{extract_chinese_message, extract_english_message, AuthError, DomainError};
use tg_shared::errors::error_codes;
use tracing::{error, warn};

use crate::dto::{ErrorResponse, ErrorResponseExt};

/// Language preference for error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Chinese,
}

impl Language {
    /// Detect language preference from the Accept-Language header
    pub fn from_request(req: &HttpRequest) -> Self {
        let Some(header_str) = req
            .headers()
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
        else {
            return Language::English;
        };

        // Example: "zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7"
        let mut preferred = Language::English;
        let mut max_quality = 0.0_f32;
        for part in header_str.split(',') {
            let mut pieces = part.trim().split(';');
            let language = pieces.next().unwrap_or_default().to_lowercase();
            let quality = pieces
                .next()
                .and_then(|q| q.trim().trim_start_matches("q=").parse::<f32>().ok())
                .unwrap_or(1.0);

            if quality <= max_quality {
                continue;
            }
            if language.starts_with("zh") {
                preferred = Language::Chinese;
                max_quality = quality;
            } else if language.starts_with("en") {
                preferred = Language::English;
                max_quality = quality;
            }
        }
        preferred
    }

    /// Picks one half of an "English | 中文" message
    pub fn localize<'a>(&self, message: &'a str) -> &'a str {
        match self {
            Language::English => extract_english_message(message),
            Language::Chinese => extract_chinese_message(message),
        }
    }
}

pub fn extract_language(req: &HttpRequest) -> Language {
    Language::from_request(req)
}

pub fn auth_error_status(error: &AuthError) -> StatusCode {
    match error {
        AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
        AuthError::InvalidToken | AuthError::SessionTimeout | AuthError::Unauthorized => {
            StatusCode::UNAUTHORIZED
        }
    }
}

/// Renders an authentication failure as `{success: false, error_code, message}`
pub fn auth_error_response(error: &AuthError, lang: Language) -> HttpResponse {
    let message = error.to_string();
    ErrorResponse::new(error.code(), lang.localize(&message)).to_response(auth_error_status(error))
}

/// Renders a domain error
///
/// Every token failure is reported as `INVALID_TOKEN`; the precise reason is
/// only logged.
pub fn domain_error_response(error: &DomainError, lang: Language) -> HttpResponse {
    match error {
        DomainError::Auth(auth) => auth_error_response(auth, lang),
        DomainError::Token(token) => {
            warn!(reason = token.code(), "Token operation rejected");
            let message = token.to_string();
            ErrorResponse::new(error_codes::INVALID_TOKEN, lang.localize(&message))
                .to_response(StatusCode::UNAUTHORIZED)
        }
        DomainError::Validation { message } => {
            ErrorResponse::new(error_codes::BAD_REQUEST, message.clone())
                .to_response(StatusCode::BAD_REQUEST)
        }
        DomainError::Storage { message } | DomainError::Internal { message } => {
            error!(error = %message, "Request failed");
            let message = match lang {
                Language::English => "An internal error occurred",
                Language::Chinese => "服务器内部错误",
            };
            ErrorResponse::new(error_codes::INTERNAL_ERROR, message)
                .to_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use tg_core::errors::TokenError;

    #[test]
    fn test_language_detection() {
        let req = TestRequest::default()
            .insert_header((header::ACCEPT_LANGUAGE, "zh-CN,zh;q=0.9,en;q=0.8"))
            .to_http_request();
        assert_eq!(Language::from_request(&req), Language::Chinese);

        let req = TestRequest::default()
            .insert_header((header::ACCEPT_LANGUAGE, "en-US,zh;q=0.5"))
            .to_http_request();
        assert_eq!(Language::from_request(&req), Language::English);

        let req = TestRequest::default().to_http_request();
        assert_eq!(Language::from_request(&req), Language::English);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(auth_error_status(&AuthError::InvalidToken), StatusCode::UNAUTHORIZED);
        assert_eq!(auth_error_status(&AuthError::SessionTimeout), StatusCode::UNAUTHORIZED);
        assert_eq!(auth_error_status(&AuthError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            auth_error_status(&AuthError::InsufficientPermissions),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_token_errors_collapse_to_invalid_token() {
        let response = domain_error_response(
            &DomainError::Token(TokenError::OutsideRefreshWindow),
            Language::English,
        );
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = domain_error_response(
            &DomainError::Storage {
                message: "disk full".to_string(),
            },
            Language::English,
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
