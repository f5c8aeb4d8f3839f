//! Connectivity observation
//!
//! This module reads what the host knows about the network:
//! - `probe` takes one snapshot and describes it
//! - `notifier` turns change events into tier updates
//! - `estimator` measures throughput from decoded media when the host has no
//!   connectivity API

pub mod estimator;
mod gate;
pub mod notifier;
pub mod probe;
pub mod signal;
pub mod source;

pub use estimator::{
    estimate_bandwidth_from_media, BandwidthEstimate, EstimatorHandle, MediaSource,
    DEFAULT_SAMPLE_INTERVAL,
};
pub use notifier::{subscribe, subscribe_with_options, NotifierOptions, Subscription};
pub use probe::{describe, read_signal};
pub use signal::{ConnectionCategory, EffectiveSpeedClass, NetworkSignal};
pub use source::{ChangeListener, ConnectivitySource, ListenerId, NoConnectivity, SharedConnectivity};
