use actix_web::{web, HttpResponse};
use sms_shared::utils::mask_phone_number;
use sms_shared::ResponseEnvelope;
use validator::Validate;

use crate::app::AppState;
use crate::dto::SendCodeRequest;
use crate::handlers::{failure, respond, validation_failure};

/// Handler for POST /api/sms/verification/send
///
/// # Request Body
///
/// ```json
/// {
///     "phoneNumber": "+5511999999999",
///     "appId": "FA+9qCX9VSu",
///     "bandeira": "X",
///     "content": ""
/// }
/// ```
///
/// On success `msg` carries the provider's message and `data` is empty.
pub async fn send_code(
    state: web::Data<AppState>,
    request: web::Json<SendCodeRequest>,
) -> HttpResponse {
    let request = request.into_inner();

    if let Err(errors) = request.validate() {
        tracing::warn!(
            phone = %mask_phone_number(&request.phone_number),
            errors = %errors,
            "Validation failed for send request"
        );
        return validation_failure(&errors);
    }

    tracing::debug!(
        tenant = %request.bandeira,
        phone = %mask_phone_number(&request.phone_number),
        "Processing send request"
    );

    match state.service.send(request.into_command()).await {
        Ok(result) => respond(ResponseEnvelope::ok_with_message(result.message)),
        Err(error) => failure(&error),
    }
}
