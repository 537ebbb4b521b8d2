//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod affiliate;
pub mod commission_tier;
pub mod invite;
pub mod payout;
pub mod product;
pub mod role;
pub mod sale;
pub mod session;
pub mod tenant;
pub mod tracking_link;
pub mod user;

pub use affiliate::{AffiliateEntity, AffiliateStatusDb, AffiliateWithUserEntity};
pub use commission_tier::CommissionTierEntity;
pub use invite::{InviteEntity, InviteStatusDb};
pub use payout::{PayoutEntity, PayoutStatusDb};
pub use product::ProductEntity;
pub use role::RoleEntity;
pub use sale::{CommissionDistributionEntity, SaleEntity};
pub use session::SessionEntity;
pub use tenant::{TenantEntity, TenantPlanDb};
pub use tracking_link::TrackingLinkEntity;
pub use user::{UserEntity, UserRoleDb};
