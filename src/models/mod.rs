//! Domain models.

pub mod audit;
pub mod customer;
pub mod pagination;
pub mod service_history;
pub mod service_order;
pub mod user;
pub mod vehicle;
