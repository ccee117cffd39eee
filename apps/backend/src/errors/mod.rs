//! Error handling for the Summit backend.

pub mod domain;


pub use domain::DomainError;
