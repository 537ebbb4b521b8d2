//! Domain services.

pub mod commission;
