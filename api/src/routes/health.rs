use actix_web::{web, HttpResponse};
use sms_shared::ResponseEnvelope;

use crate::app::AppState;
use crate::handlers::{failure, respond};

/// Health check endpoint handler; pings the key-value store
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    match state.service.health_check().await {
        Ok(()) => respond(ResponseEnvelope::ok_with_message("healthy").with_data(format!(
            "{}/{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ))),
        Err(error) => {
            tracing::error!(error = %error, event = "health_check_failed", "Store unreachable");
            failure(&error)
        }
    }
}
