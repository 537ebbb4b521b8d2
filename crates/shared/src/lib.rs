//! Shared utilities and common types for the affiliate platform backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (token hashing)
//! - Password hashing with Argon2id
//! - JWT token generation and validation
//! - Referral / tracking / invite code generation
//! - Common validation logic

pub mod codes;
pub mod crypto;
pub mod jwt;
pub mod password;
pub mod validation;
