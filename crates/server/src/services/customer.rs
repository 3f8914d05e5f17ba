//! Customer service.
//!
//! Sits between the HTTP handlers and the [`CustomerRepository`]. Domain
//! rules for customers (name format, length limits) belong here; today every
//! call is forwarded unchanged.

use std::sync::Arc;

use anyhow::Result;

use crate::models::{Customer, CustomerId, CustomerInput};
use crate::store::CustomerRepository;

/// Customer operations exposed to the HTTP surface.
#[derive(Clone)]
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
}

impl CustomerService {
    /// Create a new customer service over the given repository.
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }

    pub async fn select(&self) -> Result<Vec<Customer>> {
        self.repository.select().await
    }

    pub async fn select_by_id(&self, id: CustomerId) -> Result<Option<Customer>> {
        self.repository.select_by_id(id).await
    }

    pub async fn insert(&self, input: CustomerInput) -> Result<CustomerId> {
        self.repository.insert(input).await
    }

    pub async fn update(&self, id: CustomerId, input: CustomerInput) -> Result<bool> {
        self.repository.update(id, input).await
    }

    pub async fn delete(&self, id: CustomerId) -> Result<bool> {
        self.repository.delete(id).await
    }
}

impl std::fmt::Debug for CustomerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerService").finish()
    }
}
