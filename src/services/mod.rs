//! Business logic services.

pub mod agent;
pub mod catalog;
pub mod dashboard;
pub mod filters;
pub mod identity;
pub mod image;
pub mod property;
pub mod roles;
pub mod storage;
