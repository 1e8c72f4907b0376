// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const USER_REGISTERED: &str = "identity.registered";
pub const REGISTER_FAILED: &str = "identity.register_failed";
pub const ACCOUNT_CONFIRMED: &str = "identity.confirmed";
pub const CONFIRM_FAILED: &str = "identity.confirm_failed";
pub const SIGN_IN_SUCCEEDED: &str = "identity.sign_in.succeeded";
pub const SIGN_IN_FAILED: &str = "identity.sign_in.failed";
