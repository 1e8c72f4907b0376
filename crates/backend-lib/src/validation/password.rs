// ============================
// crates/backend-lib/src/validation/password.rs
// ============================
//! Password complexity rules.

use regex::Regex;
use std::sync::LazyLock;

/// Shortest password accepted
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Longest password the complexity rule accepts
pub const MAX_PASSWORD_LENGTH: usize = 15;

pub const TOO_SHORT: &str = "Password is less than 8 characters in length!";
pub const NOT_COMPLEX: &str = "Password does not match complexity requirements!";
pub const BANNED_CAPITA: &str = "Password cannot be Capita or any variation of Capita!";
pub const BANNED_PASSWORD: &str = "Password cannot be Password or any variation of Password!";

/// Literal values refused regardless of case, with the message each produces
const BANNED_PASSWORDS: [(&str, &str); 2] = [("capita", BANNED_CAPITA), ("password", BANNED_PASSWORD)];

static LOWERCASE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]").unwrap());
static UPPERCASE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]").unwrap());
static DIGIT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").unwrap());
static LENGTH_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^.{8,15}$").unwrap());

/// Stateless password policy
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordPolicy;

impl PasswordPolicy {
    /// Every rule `password` breaks, in rule order. Empty when compliant.
    pub fn validate(password: &str) -> Vec<String> {
        let mut violations = Vec::new();

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            violations.push(TOO_SHORT.to_string());
        }

        if !Self::is_complex(password) {
            violations.push(NOT_COMPLEX.to_string());
        }

        let lowered = password.to_lowercase();
        for (banned, message) in BANNED_PASSWORDS {
            if lowered == banned {
                violations.push(message.to_string());
            }
        }

        violations
    }

    /// At least one lowercase letter, one uppercase letter and one digit,
    /// 8 to 15 characters on a single line
    pub fn is_complex(password: &str) -> bool {
        LOWERCASE_REGEX.is_match(password)
            && UPPERCASE_REGEX.is_match(password)
            && DIGIT_REGEX.is_match(password)
            && LENGTH_REGEX.is_match(password)
    }
}
