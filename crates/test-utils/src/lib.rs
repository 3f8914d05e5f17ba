//! Customers service test utilities.
//!
//! Fixtures shared by the integration tests: known credentials, a signing
//! secret, per-test client addresses and request bodies.

use serde_json::Value as JsonValue;

/// Signing secret used by test applications (>= 32 bytes).
pub const TEST_JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long!!";

/// Login name present in [`test_secrets`].
pub const TEST_USER: &str = "fake.admin.authorized";

/// Password for [`TEST_USER`].
pub const TEST_PASSWORD: &str = "fake.admin.authorized";

/// Login name absent from [`test_secrets`].
pub const UNKNOWN_USER: &str = "fake.admin.unauthorized";

/// The name→password pairs a test secret source should hold.
pub fn test_secrets() -> Vec<(String, String)> {
    vec![
        (TEST_USER.to_string(), TEST_PASSWORD.to_string()),
        ("customer.api".to_string(), "Sup3r-S3cret".to_string()),
    ]
}

/// Derive a stable fake client IP from a test label.
///
/// Each test sends its own `X-Forwarded-For` so rate-limit buckets don't
/// collide between tests.
pub fn test_ip_for(label: &str) -> String {
    let hash = label
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
    format!(
        "10.{}.{}.{}",
        (hash >> 16) & 0xff,
        (hash >> 8) & 0xff,
        (hash & 0xfe) + 1
    )
}

/// JSON body for creating or replacing a customer.
pub fn customer_body(name: &str) -> JsonValue {
    serde_json::json!({ "name": name })
}

/// URL-encoded login form body.
pub fn login_form(name: &str, password: &str) -> String {
    format!(
        "name={}&password={}",
        urlencoding::encode(name),
        urlencoding::encode(password)
    )
}
