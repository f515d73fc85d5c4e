//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod assignment;
pub mod booking;
pub mod catalog;
pub mod panchayath;
pub mod payment;
pub mod user;

pub use assignment::AssignmentEntity;
pub use booking::{BookingEntity, BookingStatsEntity};
pub use catalog::{
    AddonServiceEntity, CategoryFeatureMappingEntity, CustomFeatureEntity, PackageEntity,
    ServiceCategoryEntity,
};
pub use panchayath::{PanchayathEntity, StaffCoverageEntity};
pub use payment::{PaymentEntity, RatingEntity};
pub use user::UserEntity;
