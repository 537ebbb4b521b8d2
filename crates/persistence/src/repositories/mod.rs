//! Repository layer for database access.
//!
//! Repositories wrap a `PgPool` and expose typed queries for one aggregate
//! each. Multi-step workflows (signup, invite acceptance, sale recording,
//! payout settlement) run through the `_tx` variants so callers control the
//! transaction boundary.

pub mod affiliate;
pub mod commission_tier;
pub mod distribution;
pub mod invite;
pub mod payout;
pub mod product;
pub mod role;
pub mod sale;
pub mod session;
pub mod tenant;
pub mod tracking_link;
pub mod user;

pub use affiliate::AffiliateRepository;
pub use commission_tier::CommissionTierRepository;
pub use distribution::DistributionRepository;
pub use invite::InviteRepository;
pub use payout::PayoutRepository;
pub use product::ProductRepository;
pub use role::RoleRepository;
pub use sale::SaleRepository;
pub use session::SessionRepository;
pub use tenant::TenantRepository;
pub use tracking_link::TrackingLinkRepository;
pub use user::UserRepository;
