//! SMS vendor providers
//!
//! Every vendor implements the core `VerificationProvider` trait and reports
//! outcomes, transport failures included, as an `SmsResult`.
//!
//! - **Sinch**: verification API, vendor-generated codes
//! - **Zenvia**: plain messaging API, codes compared locally
//! - **Mock**: logs sends, accepts a configured code

use std::sync::Arc;
use std::time::Duration;

use sms_core::services::provider::VerificationProvider;
use sms_shared::config::ProvidersConfig;

use crate::errors::InfrastructureError;

pub mod mock;
pub mod sinch;
pub mod zenvia;

#[cfg(test)]
mod tests;

pub use mock::{MockProvider, MOCK_PROVIDER_NAME};
pub use sinch::{translate_error, SinchProvider, SINCH_PROVIDER_NAME};
pub use zenvia::{ZenviaProvider, ZENVIA_PROVIDER_NAME};

/// Build every supported provider from configuration
///
/// The registry picks the active one by name.
pub fn create_providers(
    config: &ProvidersConfig,
) -> Result<Vec<Arc<dyn VerificationProvider>>, InfrastructureError> {
    let timeout = Duration::from_secs(config.http_timeout_seconds);

    let providers: Vec<Arc<dyn VerificationProvider>> = vec![
        Arc::new(SinchProvider::new(config.sinch.clone(), timeout)?),
        Arc::new(ZenviaProvider::new(config.zenvia.clone(), timeout)?),
        Arc::new(MockProvider::new(&config.mock)),
    ];

    tracing::info!(
        providers = ?providers.iter().map(|p| p.provider_name().to_string()).collect::<Vec<_>>(),
        http_timeout_seconds = config.http_timeout_seconds,
        "SMS providers created"
    );
    Ok(providers)
}
