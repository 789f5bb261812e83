use actix_web::{web, HttpResponse};
use sms_shared::utils::mask_phone_number;
use sms_shared::ResponseEnvelope;
use validator::Validate;

use crate::app::AppState;
use crate::dto::VerifyCodeRequest;
use crate::handlers::{failure, respond, validation_failure};

/// Handler for POST /api/sms/verification/verify
///
/// On success `data` carries the provider message id, which is the token
/// downstream systems pass to `findToken`.
pub async fn verify_code(
    state: web::Data<AppState>,
    request: web::Json<VerifyCodeRequest>,
) -> HttpResponse {
    let request = request.into_inner();

    if let Err(errors) = request.validate() {
        tracing::warn!(
            phone = %mask_phone_number(&request.phone_number),
            errors = %errors,
            "Validation failed for verify request"
        );
        return validation_failure(&errors);
    }

    match state.service.verify(request.into_command()).await {
        Ok(result) => respond(
            ResponseEnvelope::ok_with_message(result.message).with_data(result.provider_message_id),
        ),
        Err(error) => failure(&error),
    }
}
