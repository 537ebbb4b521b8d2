//! Custom axum extractors.

pub mod user_auth;

pub use user_auth::AdminAuth;
