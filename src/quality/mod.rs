//! Quality tier selection and translation
//!
//! - `selector` picks a tier from connectivity and entitlement
//! - `tier` maps a tier to capture constraints and a bitrate budget

pub mod selector;
pub mod tier;

pub use selector::{select_quality, select_quality_with_rule, SelectionRule};
pub use tier::{
    to_constraint, to_estimated_bitrate, MediaConstraint, QualityProfile, QualityTier, Resolution,
};
