//! Business logic services.

pub mod auth;
pub mod dashboard;
pub mod lead;
pub mod storage;
pub mod traffic;
pub mod villa;
