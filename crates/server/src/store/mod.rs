//! Customer record storage.
//!
//! All customer reads and writes go through [`CustomerRepository`], so the
//! in-memory store can be swapped for a persistent backend without touching
//! the service layer or the HTTP surface.

mod memory;

use anyhow::Result;
use async_trait::async_trait;

pub use memory::InMemoryCustomerStore;

use crate::models::{Customer, CustomerId, CustomerInput};

/// Customer storage backend trait.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// All customers in insertion order.
    async fn select(&self) -> Result<Vec<Customer>>;

    /// Look up a customer by id. `None` means not found.
    async fn select_by_id(&self, id: CustomerId) -> Result<Option<Customer>>;

    /// Store a new customer and return its freshly assigned id.
    async fn insert(&self, input: CustomerInput) -> Result<CustomerId>;

    /// Replace the name of an existing customer. Returns `false` if the id
    /// is unknown.
    async fn update(&self, id: CustomerId, input: CustomerInput) -> Result<bool>;

    /// Remove a customer. Returns `false` if the id is unknown.
    async fn delete(&self, id: CustomerId) -> Result<bool>;
}
