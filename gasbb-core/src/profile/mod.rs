//! Supply and demand profiles

pub mod demand;
pub mod supply;

pub use demand::build_demand_profile;
pub use supply::{
    build_supply_profile, coalesce_available, duplicate_facilities, join_outlook_nameplate,
    supply_profile_from_reports,
};
