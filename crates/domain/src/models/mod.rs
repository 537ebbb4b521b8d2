//! Domain models for the affiliate platform.

pub mod affiliate;
pub mod commission_tier;
pub mod invite;
pub mod pagination;
pub mod payout;
pub mod product;
pub mod role;
pub mod sale;
pub mod tenant;
pub mod tracking_link;
pub mod user;

pub use affiliate::{Affiliate, AffiliateStatus};
pub use commission_tier::{CommissionTier, DEFAULT_TIER_NAME};
pub use invite::{Invite, InviteStatus};
pub use pagination::Pagination;
pub use payout::{Payout, PayoutStatus};
pub use product::Product;
pub use role::Role;
pub use sale::Sale;
pub use tenant::{Plan, PlanLimit, Tenant};
pub use tracking_link::TrackingLink;
pub use user::{User, UserRole};
