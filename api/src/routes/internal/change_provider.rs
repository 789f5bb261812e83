use actix_web::{web, HttpResponse};
use sms_shared::{error_codes, ResponseEnvelope};

use crate::app::AppState;
use crate::dto::ProviderQuery;
use crate::handlers::envelope::INVALID_REQUEST_MESSAGE;
use crate::handlers::{failure, respond};

/// Handler for GET /api/sms-internal/provider?provider=NAME&key=SECRET
///
/// `provider=?` reports the active provider without a key.
pub async fn change_provider(
    state: web::Data<AppState>,
    query: web::Query<ProviderQuery>,
) -> HttpResponse {
    let query = query.into_inner();

    if query.provider.is_empty() {
        return respond(ResponseEnvelope::error(
            error_codes::INVALID_INPUT,
            INVALID_REQUEST_MESSAGE,
        ));
    }

    if query.is_query() {
        return respond(ResponseEnvelope::ok_with_message(format!(
            "Provider: {}",
            state.service.active_provider()
        )));
    }

    match state.service.change_provider(&query.provider, &query.key) {
        Ok(name) => respond(ResponseEnvelope::ok_with_message(format!(
            "New provider activated: {}",
            name
        ))),
        Err(error) => failure(&error),
    }
}
