//! Credential verification against the configured secret source.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::models::User;
use crate::services::secrets::SecretSource;

/// Checks login credentials.
#[derive(Clone)]
pub struct UserService {
    secrets: Arc<dyn SecretSource>,
    timeout: Duration,
}

impl UserService {
    /// Create a new user service. `timeout` bounds each secret fetch.
    pub fn new(secrets: Arc<dyn SecretSource>, timeout: Duration) -> Self {
        Self { secrets, timeout }
    }

    /// Check whether `user` names a known principal with a matching password.
    ///
    /// Returns `Err` when the secret source fails or does not answer in time;
    /// callers treat that as a failed login.
    pub async fn is_valid_user(&self, user: &User) -> Result<bool> {
        let secrets = tokio::time::timeout(self.timeout, self.secrets.fetch())
            .await
            .map_err(|_| {
                anyhow::anyhow!(
                    "{} secret source timed out after {:?}",
                    self.secrets.kind(),
                    self.timeout
                )
            })?
            .with_context(|| format!("failed to fetch secrets from {}", self.secrets.kind()))?;

        let valid = secrets.get(&user.name).is_some_and(|expected| {
            bool::from(expected.as_bytes().ct_eq(user.password.as_bytes()))
        });

        debug!(name = %user.name, valid, "credentials checked");
        Ok(valid)
    }
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("secrets", &self.secrets.kind())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::services::secrets::{SecretMap, StaticSecretSource};

    fn service() -> UserService {
        let secrets: StaticSecretSource = [("fake.admin.authorized", "fake.admin.authorized")]
            .into_iter()
            .collect();
        UserService::new(Arc::new(secrets), Duration::from_secs(1))
    }

    /// Never answers.
    struct HangingSource;

    #[async_trait]
    impl SecretSource for HangingSource {
        async fn fetch(&self) -> Result<SecretMap> {
            std::future::pending().await
        }

        fn kind(&self) -> &'static str {
            "hanging"
        }
    }

    /// Always fails.
    struct BrokenSource;

    #[async_trait]
    impl SecretSource for BrokenSource {
        async fn fetch(&self) -> Result<SecretMap> {
            anyhow::bail!("connection refused")
        }

        fn kind(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn matching_pair_is_valid() {
        let user = User::new("fake.admin.authorized", "fake.admin.authorized");
        assert!(service().is_valid_user(&user).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_name_is_invalid() {
        let user = User::new("fake.admin.unauthorized", "fake.admin.unauthorized");
        assert!(!service().is_valid_user(&user).await.unwrap());
    }

    #[tokio::test]
    async fn wrong_password_is_invalid() {
        let user = User::new("fake.admin.authorized", "fake.admin.authorize");
        assert!(!service().is_valid_user(&user).await.unwrap());
    }

    #[tokio::test]
    async fn comparison_is_case_sensitive() {
        let user = User::new("FAKE.ADMIN.AUTHORIZED", "fake.admin.authorized");
        assert!(!service().is_valid_user(&user).await.unwrap());

        let user = User::new("fake.admin.authorized", "FAKE.ADMIN.AUTHORIZED");
        assert!(!service().is_valid_user(&user).await.unwrap());
    }

    #[tokio::test]
    async fn slow_source_times_out() {
        let service = UserService::new(Arc::new(HangingSource), Duration::from_millis(20));
        let err = service
            .is_valid_user(&User::new("admin", "pw"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn source_failure_is_an_error() {
        let service = UserService::new(Arc::new(BrokenSource), Duration::from_secs(1));
        assert!(service.is_valid_user(&User::new("admin", "pw")).await.is_err());
    }
}
