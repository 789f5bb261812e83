//! Application state and route table

use std::sync::Arc;

use actix_web::web;
use sms_core::services::VerificationService;

use crate::handlers::{json_error_handler, query_error_handler};
use crate::routes::{health, internal, verification};

pub const ROOT_ENDPOINT: &str = "/api/sms";
pub const ROOT_INTERNAL_ENDPOINT: &str = "/api/sms-internal";

/// Application state shared by every worker
pub struct AppState {
    pub service: Arc<VerificationService>,
}

impl AppState {
    pub fn new(service: Arc<VerificationService>) -> Self {
        Self { service }
    }
}

/// Register extractors and routes
///
/// The caller provides `web::Data<AppState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope(ROOT_ENDPOINT).service(
                web::scope("/verification")
                    .route("/send", web::post().to(verification::send_code))
                    .route("/verify", web::post().to(verification::verify_code)),
            ),
        )
        .service(
            web::scope(ROOT_INTERNAL_ENDPOINT)
                .route("/findToken", web::post().to(internal::find_token))
                .route("/provider", web::get().to(internal::change_provider)),
        );
}
