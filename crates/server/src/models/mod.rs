//! Domain models.

pub mod customer;
pub mod user;

pub use customer::{Customer, CustomerInput, CustomerId, DEMO_CUSTOMER_NAMES};
pub use user::User;
