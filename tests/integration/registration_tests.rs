// =======================================
// tests/integration/registration_tests.rs
// =======================================
//! Registration validation against a live repository
use crate::test_utils::{register_user, setup_manager, valid_request, EMAIL};
use identity_core::{
    validation::registration::{
        EMAIL_MISSING, EMPLOYEE_ID_MISSING, FIRST_NAME_MISSING, PASSWORDS_DO_NOT_MATCH,
        PROFIT_CENTER_MISSING, SURNAME_MISSING,
    },
    InMemoryRepository, RegistrationRequest, RegistrationValidator, User,
};
use std::sync::Arc;

#[tokio::test]
async fn test_request_decoded_from_json() {
    let request: RegistrationRequest = serde_json::from_str(
        r#"{
            "email": "jo.bloggs@capita.co.uk",
            "firstName": "Jo",
            "surname": "Bloggs",
            "employeeId": "12345678",
            "profitCenterId": "ZITX",
            "password": "Secret123",
            "confirmPassword": "Secret123"
        }"#,
    )
    .unwrap();

    let validator = RegistrationValidator::new(Arc::new(InMemoryRepository::<User>::new()), "capita.co.uk");
    assert!(validator.validate(&request).await.succeeded());
}

#[tokio::test]
async fn test_missing_fields_are_all_reported() {
    let validator = RegistrationValidator::new(Arc::new(InMemoryRepository::<User>::new()), "capita.co.uk");
    let request = RegistrationRequest {
        email: EMAIL.to_string(),
        password: "Secret123".to_string(),
        confirm_password: "Secret124".to_string(),
        ..RegistrationRequest::default()
    };

    let outcome = validator.validate(&request).await;
    assert_eq!(
        outcome.errors(),
        [
            PASSWORDS_DO_NOT_MATCH,
            PROFIT_CENTER_MISSING,
            EMPLOYEE_ID_MISSING,
            FIRST_NAME_MISSING,
            SURNAME_MISSING,
        ]
    );
    assert!(!outcome.errors().contains(&EMAIL_MISSING.to_string()));
}

#[tokio::test]
async fn test_configured_domain_is_enforced() {
    let validator = RegistrationValidator::new(Arc::new(InMemoryRepository::<User>::new()), "example.org");
    assert_eq!(validator.email_domain(), "example.org");

    let outcome = validator.validate(&valid_request()).await;
    assert_eq!(outcome.errors(), ["Only example.org emails are allowed!"]);
}

#[tokio::test]
async fn test_weak_password_fails_registration() {
    let (manager, _repo) = setup_manager();
    let mut request = valid_request();
    request.password = "Password".to_string();
    request.confirm_password = "Password".to_string();

    let outcome = manager.register(&request, None).await.unwrap();
    assert_eq!(
        outcome.errors(),
        [
            "Password does not match complexity requirements!",
            "Password cannot be Password or any variation of Password!",
        ]
    );
}

#[tokio::test]
async fn test_existing_user_blocks_case_exact_email_only() {
    let (manager, _repo) = setup_manager();
    register_user(&manager).await;

    // Lookup is exact, so a differently cased address is a different user
    let mut request = valid_request();
    request.email = "Jo.Bloggs@capita.co.uk".to_string();
    assert!(manager.register(&request, None).await.unwrap().succeeded());
}
