use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::domain::error::AppError;

pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `{"error": message}` with the status matching the error category.
pub fn error_response(err: &AppError) -> HttpResponse {
    HttpResponse::build(status_for(err)).json(json!({ "error": err.message() }))
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        status_for(self)
    }

    fn error_response(&self) -> HttpResponse {
        error_response(self)
    }
}
