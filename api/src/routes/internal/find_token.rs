use actix_web::{web, HttpResponse};
use sms_shared::{error_codes, ResponseEnvelope};
use validator::Validate;

use crate::app::AppState;
use crate::dto::FindTokenRequest;
use crate::handlers::{failure, respond, validation_failure};

pub const TOKEN_FOUND_MESSAGE: &str = "OK";

/// Handler for POST /api/sms-internal/findToken
///
/// `data` is a JSON document `{"phoneNumber": ..., "validationCode": ...}`
/// serialized as a string. Tokens stay readable until they expire.
pub async fn find_token(
    state: web::Data<AppState>,
    request: web::Json<FindTokenRequest>,
) -> HttpResponse {
    let request = request.into_inner();
    if let Err(errors) = request.validate() {
        return validation_failure(&errors);
    }

    let data = match state.service.find_token(&request.token).await {
        Ok(data) => data,
        Err(error) => return failure(&error),
    };

    match serde_json::to_string(&data) {
        Ok(json) => respond(ResponseEnvelope::ok_with_message(TOKEN_FOUND_MESSAGE).with_data(json)),
        Err(error) => {
            tracing::error!(error = %error, "Failed to serialize token data");
            respond(
                ResponseEnvelope::error(error_codes::INVALID_INPUT, "Token data could not be encoded")
                    .with_data(error.to_string()),
            )
        }
    }
}
