use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::SmsResult;
use crate::errors::DomainError;

use super::{support_message, ProviderRegistry, VerificationProvider};

struct NamedProvider(&'static str);

#[async_trait]
impl VerificationProvider for NamedProvider {
    fn provider_name(&self) -> &str {
        self.0
    }

    async fn send_verification(&self, _phone: &str, _content: &str, _hash: &str) -> SmsResult {
        SmsResult::success("sent", format!("{}-id", self.0))
    }

    async fn verify(&self, _phone: &str, _sent: &str, _received: &str) -> SmsResult {
        SmsResult::success("ok", "")
    }
}

fn registry(admin_key: &str) -> ProviderRegistry {
    let providers: Vec<Arc<dyn VerificationProvider>> = vec![
        Arc::new(NamedProvider("Sinch")),
        Arc::new(NamedProvider("Zenvia")),
    ];
    ProviderRegistry::new(providers, "Sinch", admin_key).unwrap()
}

#[test]
fn test_default_provider_is_active() {
    let registry = registry("secret");
    assert_eq!(registry.active_name(), "Sinch");
    assert_eq!(registry.provider_names(), vec!["Sinch", "Zenvia"]);
}

#[test]
fn test_unknown_default_provider_is_rejected() {
    let providers: Vec<Arc<dyn VerificationProvider>> = vec![Arc::new(NamedProvider("Sinch"))];
    let result = ProviderRegistry::new(providers, "Acme", "k");
    assert!(matches!(result, Err(DomainError::InvalidProvider { .. })));
}

#[test]
fn test_switch_requires_matching_key() {
    let registry = registry("secret");

    assert_eq!(
        registry.activate("Zenvia", "wrong").unwrap_err(),
        DomainError::Unauthorized
    );
    assert_eq!(registry.active_name(), "Sinch");

    assert_eq!(registry.activate("Zenvia", "secret").unwrap(), "Zenvia");
    assert_eq!(registry.active_name(), "Zenvia");
}

#[test]
fn test_empty_admin_key_disables_switching() {
    let registry = registry("");
    assert_eq!(
        registry.activate("Zenvia", "").unwrap_err(),
        DomainError::Unauthorized
    );
}

#[test]
fn test_unknown_provider_is_rejected() {
    let registry = registry("secret");
    assert!(matches!(
        registry.activate("Acme", "secret"),
        Err(DomainError::InvalidProvider { .. })
    ));
    assert_eq!(registry.active_name(), "Sinch");
}

#[tokio::test]
async fn test_in_flight_reader_keeps_previous_provider() {
    let registry = registry("secret");

    let held = registry.active();
    registry.activate("Zenvia", "secret").unwrap();

    let result = held.send_verification("+5511999999999", "", "").await;
    assert_eq!(result.data, "Sinch-id");
    assert_eq!(registry.active().provider_name(), "Zenvia");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_switching_never_yields_unknown_provider() {
    let registry = Arc::new(registry("secret"));

    let mut handles = Vec::new();
    for i in 0..8 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            for j in 0..200 {
                if (i + j) % 5 == 0 {
                    let name = if j % 2 == 0 { "Zenvia" } else { "Sinch" };
                    registry.activate(name, "secret").unwrap();
                }
                let name = registry.active_name();
                assert!(name == "Sinch" || name == "Zenvia");
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
}

#[test]
fn test_support_message() {
    assert_eq!(support_message(60001), "Error 60001. Please contact our support team.");
}
