//! StrangerWave media - adaptive video quality for calls.
//!
//! Picks a video quality tier from what the host knows about the network,
//! the caller's entitlement and the data-saver preference, and keeps picking
//! as the network changes. The chosen tier translates into capture
//! constraints and a bitrate budget for the media pipeline.

pub mod config;
pub mod logging;
pub mod network;
pub mod platform;
pub mod quality;
pub mod service;
pub mod utils;

pub use config::QualityConfig;
pub use network::{
    ConnectionCategory, ConnectivitySource, EffectiveSpeedClass, EstimatorHandle, MediaSource,
    NetworkSignal, SharedConnectivity, Subscription,
};
pub use platform::Platform;
pub use quality::{select_quality, MediaConstraint, QualityProfile, QualityTier};
pub use service::QualityService;
pub use utils::error::{QualityError, QualityResult};
