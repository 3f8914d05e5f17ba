//! Process-local customer store.

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::CustomerRepository;
use crate::models::{Customer, CustomerId, CustomerInput};

/// List and id counter, always locked together.
#[derive(Debug, Default)]
struct Records {
    customers: Vec<Customer>,
    /// Highest id handed out so far. Never decremented, so ids freed by
    /// delete are not reused.
    last_id: CustomerId,
}

impl Records {
    fn push(&mut self, name: String) -> CustomerId {
        self.last_id += 1;
        let id = self.last_id;
        self.customers.push(Customer { id, name });
        id
    }

    fn find_mut(&mut self, id: CustomerId) -> Option<&mut Customer> {
        self.customers.iter_mut().find(|c| c.id == id)
    }
}

/// In-memory [`CustomerRepository`]. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct InMemoryCustomerStore {
    records: RwLock<Records>,
}

impl InMemoryCustomerStore {
    /// Create an empty store; the first insert gets id 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `names` as ids `1..=names.len()`.
    pub fn seeded<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut records = Records::default();
        for name in names {
            records.push(name.into());
        }
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of stored customers.
    pub fn len(&self) -> usize {
        self.records.read().customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerStore {
    async fn select(&self) -> Result<Vec<Customer>> {
        Ok(self.records.read().customers.clone())
    }

    async fn select_by_id(&self, id: CustomerId) -> Result<Option<Customer>> {
        let records = self.records.read();
        Ok(records.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, input: CustomerInput) -> Result<CustomerId> {
        let id = self.records.write().push(input.name);
        debug!(customer_id = id, "customer inserted");
        Ok(id)
    }

    async fn update(&self, id: CustomerId, input: CustomerInput) -> Result<bool> {
        let mut records = self.records.write();
        let Some(customer) = records.find_mut(id) else {
            return Ok(false);
        };
        customer.name = input.name;
        debug!(customer_id = id, "customer updated");
        Ok(true)
    }

    async fn delete(&self, id: CustomerId) -> Result<bool> {
        let mut records = self.records.write();
        if !records.customers.iter().any(|c| c.id == id) {
            return Ok(false);
        }
        records.customers.retain(|c| c.id != id);
        debug!(customer_id = id, "customer deleted");
        Ok(true)
    }
}
