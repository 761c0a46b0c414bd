use actix_web::error::{InternalError, JsonPayloadError, PathError};
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use tracing::warn;
use validator::ValidationErrors;

/// Envelope for error bodies.
#[derive(Serialize, Debug)]
pub struct ApiResponse {
    success: bool,
    error: String,
}

impl ApiResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// 400 response for a body that failed validation.
pub fn validation_failed(errors: &ValidationErrors) -> HttpResponse {
    warn!("Rejected payment body: {}", errors);
    HttpResponse::BadRequest().json(ApiResponse::error(format!(
        "Validation failed: {}",
        errors
    )))
}

/// Turns unreadable or incomplete JSON bodies into a 400 with the usual
/// error envelope.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!("Invalid JSON body on {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::error(format!("Invalid request body: {}", err)));
    InternalError::from_response(err, response).into()
}

/// Path segments that don't parse (e.g. a non-numeric id) become a 400.
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    warn!("Invalid path parameter on {}: {}", req.path(), err);
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::error(format!("Invalid path parameter: {}", err)));
    InternalError::from_response(err, response).into()
}
