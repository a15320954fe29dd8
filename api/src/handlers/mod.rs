pub mod error;

pub use error::{
    auth_error_response, domain_error_response, extract_language, Language,
};
