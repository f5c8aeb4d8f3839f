//! Quality service
//!
//! Ties the probe, selector, translator, notifier and estimator to one host.
//! The application constructs a single instance at its composition root and
//! passes it to whatever needs quality decisions.

use crate::config::QualityConfig;
use crate::network::estimator::{
    estimate_bandwidth_from_media, BandwidthEstimate, EstimatorHandle, MediaSource,
};
use crate::network::notifier::{subscribe_with_options, NotifierOptions, Subscription};
use crate::network::probe::{describe, read_signal};
use crate::network::signal::NetworkSignal;
use crate::network::source::ConnectivitySource;
use crate::platform::Platform;
use crate::quality::selector::select_quality;
use crate::quality::tier::{
    to_constraint, to_estimated_bitrate, MediaConstraint, QualityProfile, QualityTier,
};
use std::sync::Arc;

/// Quality decisions for one host environment
pub struct QualityService {
    config: QualityConfig,
    platform: Platform,
    source: Option<Arc<dyn ConnectivitySource>>,
}

impl QualityService {
    /// Create a service. `source` is `None` when the host has no connectivity API.
    pub fn new(
        config: QualityConfig,
        platform: Platform,
        source: Option<Arc<dyn ConnectivitySource>>,
    ) -> Self {
        tracing::info!(
            "Quality service on {} (connectivity source: {})",
            platform,
            if source.is_some() { "present" } else { "absent" }
        );
        Self {
            config,
            platform,
            source,
        }
    }

    /// Create a service using the platform from config, or the detected one
    pub fn from_config(config: QualityConfig, source: Option<Arc<dyn ConnectivitySource>>) -> Self {
        let platform = config.resolve_platform();
        Self::new(config, platform, source)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Current connectivity snapshot
    pub fn read_signal(&self) -> NetworkSignal {
        read_signal(self.source.as_deref())
    }

    /// Display text for the current connectivity
    pub fn describe_current(&self) -> String {
        describe(&self.read_signal())
    }

    /// Tier for the current connectivity
    pub fn current_quality(&self, premium: bool) -> QualityTier {
        let tier = select_quality(&self.read_signal(), premium);
        tracing::debug!("Current quality {} (premium={})", tier, premium);
        tier
    }

    /// Tier, constraints and bitrate for the current connectivity
    pub fn current_profile(&self, premium: bool) -> QualityProfile {
        QualityProfile::from(self.current_quality(premium))
    }

    pub fn constraint_for(&self, tier: QualityTier) -> MediaConstraint {
        to_constraint(tier)
    }

    /// Estimated bitrate in kbps
    pub fn bitrate_for(&self, tier: QualityTier) -> u32 {
        to_estimated_bitrate(tier)
    }

    /// Re-select the tier on every connectivity change.
    ///
    /// `premium` is fixed for the subscription's lifetime.
    pub fn subscribe<F>(&self, on_quality_change: F, premium: bool) -> Subscription
    where
        F: Fn(QualityTier) + Send + Sync + 'static,
    {
        let options = NotifierOptions {
            suppress_unchanged: self.config.suppress_unchanged_tiers,
        };
        subscribe_with_options(self.source.as_ref(), on_quality_change, premium, options)
    }

    /// Estimate throughput from decoded media bytes.
    ///
    /// Native platforms have no decoder byte counters and get an inert handle.
    pub fn estimate_bandwidth<F>(&self, media: Arc<dyn MediaSource>, on_estimate: F) -> EstimatorHandle
    where
        F: Fn(BandwidthEstimate) + Send + Sync + 'static,
    {
        if !self.platform.supports_media_byte_counters() {
            tracing::debug!("Bandwidth estimation unavailable on {}", self.platform);
            return EstimatorHandle::inert();
        }
        estimate_bandwidth_from_media(media, self.config.sample_interval(), on_estimate)
    }
}
