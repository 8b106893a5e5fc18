//! Database models and DTOs for all domain entities.

pub mod agent;
pub mod catalog;
pub mod property;
pub mod user;
