//! Envelope rendering
//!
//! Every outcome is HTTP 200 with a `{success, code, msg, data}` body;
//! clients branch on `success` and `code`, never on the status line.

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use sms_core::errors::DomainError;
use sms_shared::{error_codes, ResponseEnvelope};
use validator::ValidationErrors;

pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request data";

/// Render an envelope with the no-cache header set
pub fn respond(envelope: ResponseEnvelope) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::PRAGMA, "no-cache"))
        .insert_header((header::EXPIRES, "Thu, 19 Nov 1981 08:52:00 GMT"))
        .insert_header((
            header::CACHE_CONTROL,
            "no-store, no-cache, must-revalidate, post-check=0, pre-check=0",
        ))
        .insert_header((header::VARY, "Accept-Language"))
        .insert_header((header::X_FRAME_OPTIONS, "SAMEORIGIN"))
        .json(envelope)
}

/// Render a domain failure
pub fn failure(error: &DomainError) -> HttpResponse {
    respond(ResponseEnvelope::error(error.code(), error.to_string()).with_data(error.data()))
}

/// Render DTO validation errors as an invalid-input envelope
pub fn validation_failure(errors: &ValidationErrors) -> HttpResponse {
    let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
    fields.sort_unstable();
    respond(
        ResponseEnvelope::error(error_codes::INVALID_INPUT, INVALID_REQUEST_MESSAGE)
            .with_data(fields.join(",")),
    )
}

/// Unreadable JSON bodies still answer with an envelope
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, event = "invalid_json", "Rejected request body");
    let response = respond(
        ResponseEnvelope::error(error_codes::INVALID_INPUT, INVALID_REQUEST_MESSAGE)
            .with_data(err.to_string()),
    );
    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = respond(
        ResponseEnvelope::error(error_codes::INVALID_INPUT, INVALID_REQUEST_MESSAGE)
            .with_data(err.to_string()),
    );
    InternalError::from_response(err, response).into()
}
