//! Database models and DTOs for all domain entities.

pub mod lead;
pub mod pagination;
pub mod user;
pub mod villa;
