//! SMS provider test suite


#[test]
fn test_create_providers_builds_catalogue() {
    let providers = super::create_providers(&sms_shared::config::ProvidersConfig::default()).unwrap();
    let names: Vec<&str> = providers.iter().map(|p| p.provider_name()).collect();
    assert_eq!(names, vec!["Sinch", "Zenvia", "Mock"]);
}
