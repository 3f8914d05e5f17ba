//! Login credentials.

use serde::Deserialize;

/// Name and password submitted to `POST /login`.
///
/// Built per request and never stored. Missing form fields become empty
/// strings so the handler can reject them uniformly.
#[derive(Clone, Default, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

impl User {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }

    /// True when either field is empty; such logins never reach the
    /// credential check.
    pub fn is_incomplete(&self) -> bool {
        self.name.is_empty() || self.password.is_empty()
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_when_either_field_empty() {
        assert!(User::new("", "secret").is_incomplete());
        assert!(User::new("admin", "").is_incomplete());
        assert!(!User::new("admin", "secret").is_incomplete());
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", User::new("admin", "hunter2"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }
}
