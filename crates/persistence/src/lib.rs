//! Persistence layer for the Cleanbook booking backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//!
//! Contended writes (job acceptance, status transitions) are implemented as
//! row-locked transactions or single conditional statements so concurrent
//! actors cannot lose updates.

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
