//! Shared utilities and common types for the Cleanbook backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Password hashing with Argon2id
//! - JWT access/refresh tokens carrying the actor's role
//! - Common validation logic for booking input
//! - Keyset-pagination cursors

pub mod jwt;
pub mod pagination;
pub mod password;
pub mod validation;
