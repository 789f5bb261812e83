use super::*;

#[test]
fn test_error_codes_are_stable() {
    assert_eq!(DomainError::validation("bad phone").code(), 1);
    assert_eq!(
        DomainError::RateLimit {
            message: "wait".to_string()
        }
        .code(),
        20429
    );
    assert_eq!(DomainError::store_write("down").code(), 20001);
    assert_eq!(DomainError::store_read("down").code(), 20002);
    assert_eq!(DomainError::not_found("gone").code(), 20404);
    assert_eq!(DomainError::Token.code(), 20404);
    assert_eq!(DomainError::Unauthorized.code(), -1);
    assert_eq!(
        DomainError::InvalidProvider {
            name: "Acme".to_string()
        }
        .code(),
        -1
    );
}

#[test]
fn test_provider_error_carries_vendor_code_and_reference() {
    let error = DomainError::Provider {
        code: 10,
        message: "Invalid number".to_string(),
        reference: "40001 - ref-9".to_string(),
    };

    assert_eq!(error.code(), 10);
    assert_eq!(error.data(), "40001 - ref-9");
    assert_eq!(error.to_string(), "Invalid number");
}

#[test]
fn test_rate_limit_message_is_displayed_verbatim() {
    let error = DomainError::RateLimit {
        message: "Try again in 2 minutes".to_string(),
    };
    assert_eq!(error.to_string(), "Try again in 2 minutes");
    assert!(!error.is_store_failure());
    assert!(DomainError::store_read("x").is_store_failure());
}
