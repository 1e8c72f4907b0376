// ==========================
// tests/unit/policy_tests.rs
// ==========================
//! Unit tests for the password policy
use identity_core::validation::password::{
    BANNED_CAPITA, BANNED_PASSWORD, NOT_COMPLEX, TOO_SHORT,
};
use identity_core::PasswordPolicy;

#[test]
fn test_compliant_password() {
    assert!(PasswordPolicy::validate("Secret123").is_empty());
    assert!(PasswordPolicy::validate("Abcdefg1").is_empty());
    assert!(PasswordPolicy::validate("Abcdefghijklm12").is_empty());
}

#[test]
fn test_short_password_reports_length_and_complexity() {
    assert_eq!(PasswordPolicy::validate("Ab1"), [TOO_SHORT, NOT_COMPLEX]);
    assert_eq!(PasswordPolicy::validate(""), [TOO_SHORT, NOT_COMPLEX]);
}

#[test]
fn test_complexity_rules() {
    // Missing uppercase
    assert_eq!(PasswordPolicy::validate("secret123"), [NOT_COMPLEX]);
    // Missing lowercase
    assert_eq!(PasswordPolicy::validate("SECRET123"), [NOT_COMPLEX]);
    // Missing digit
    assert_eq!(PasswordPolicy::validate("SecretWord"), [NOT_COMPLEX]);
    // Too long
    assert_eq!(PasswordPolicy::validate("Abcdefghijklmn12"), [NOT_COMPLEX]);
}

#[test]
fn test_banned_words_ignore_case() {
    assert_eq!(PasswordPolicy::validate("Password"), [NOT_COMPLEX, BANNED_PASSWORD]);
    assert_eq!(PasswordPolicy::validate("PASSWORD"), [NOT_COMPLEX, BANNED_PASSWORD]);
    assert_eq!(PasswordPolicy::validate("capita"), [TOO_SHORT, NOT_COMPLEX, BANNED_CAPITA]);
}

#[test]
fn test_length_counts_characters_not_bytes() {
    // 7 characters, more than 8 bytes
    assert!(PasswordPolicy::validate("Ab1éééé").contains(&TOO_SHORT.to_string()));
}
