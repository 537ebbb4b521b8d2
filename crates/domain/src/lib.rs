//! Domain layer for the affiliate platform backend.
//!
//! This crate contains:
//! - Domain models and request/response DTOs
//! - Plan limits and feature gating
//! - Commission calculation

pub mod models;
pub mod services;
