//! Business logic services.

pub mod auth;
pub mod email;
pub mod invites;

pub use auth::{AuthError, AuthService, TokenPair};
pub use email::EmailService;
pub use invites::{InviteError, InviteService};
