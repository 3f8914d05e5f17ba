//! Customer record.

use serde::{Deserialize, Serialize};

/// Customer identifier. Store-assigned ids start at 1; 0 never names a record.
pub type CustomerId = u64;

/// Names the store is seeded with when demo data is enabled.
pub const DEMO_CUSTOMER_NAMES: [&str; 5] = ["Jorge", "Alberto", "Pedro", "Paulo", "Mateus"];

/// A stored customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
}

/// Request body for creating or replacing a customer.
///
/// Any `id` sent by the client is ignored. A missing `name` deserializes
/// to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerInput {
    #[serde(default)]
    pub name: String,
}

impl CustomerInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn input_ignores_client_id() {
        let input: CustomerInput = serde_json::from_str(r#"{"id": 42, "name": "Ana"}"#).unwrap();
        assert_eq!(input, CustomerInput::new("Ana"));
    }

    #[test]
    fn input_without_name_is_empty() {
        let input: CustomerInput = serde_json::from_str("{}").unwrap();
        assert!(input.name.is_empty());
    }

    #[test]
    fn customer_serializes_flat() {
        let customer = Customer {
            id: 1,
            name: "Jorge".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&customer).unwrap(),
            serde_json::json!({ "id": 1, "name": "Jorge" })
        );
    }
}
