//! Business logic services.

pub mod aggregation;
pub mod audit;
pub mod auth;
pub mod customer;
pub mod dashboard;
pub mod document;
pub mod history;
pub mod report;
pub mod service_order;
pub mod session;
pub mod user;
pub mod vehicle;
