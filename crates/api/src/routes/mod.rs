//! HTTP route handlers.

pub mod affiliates;
pub mod auth;
pub mod commission_tiers;
pub mod health;
pub mod payouts;
pub mod products;
pub mod sales;
pub mod tenants;
pub mod tracking_links;
pub mod users;
