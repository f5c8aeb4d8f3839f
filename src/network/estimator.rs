//! Bandwidth estimation from decoded media bytes
//!
//! Fallback for hosts without a connectivity API: sample the media pipeline's
//! decoded-bytes counter on a fixed cadence and report the throughput between
//! samples.

use super::gate::Gate;
use crate::utils::error::QualityResult;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default sampling cadence
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Media pipeline exposing a decoded-bytes counter
pub trait MediaSource: Send + Sync {
    /// Total bytes decoded so far. Monotonically non-decreasing while the
    /// decoder runs; may reset on decoder restart.
    fn bytes_decoded(&self) -> QualityResult<u64>;
}

/// One throughput measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandwidthEstimate {
    /// Throughput since the previous sample in Mbps
    pub mbps: f64,

    /// When the sample was taken
    pub sampled_at: DateTime<Utc>,
}

struct Sampler {
    gate: Arc<Gate>,
    cancelled: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

/// Owns the sampling task. Dropping the handle stops sampling.
#[must_use = "dropping an EstimatorHandle stops sampling"]
pub struct EstimatorHandle {
    sampler: Option<Sampler>,
}

impl EstimatorHandle {
    /// A handle that never samples
    pub fn inert() -> Self {
        Self { sampler: None }
    }

    /// Whether samples can still be delivered
    pub fn is_active(&self) -> bool {
        self.sampler
            .as_ref()
            .map(|s| !s.cancelled.load(Ordering::Acquire) && s.gate.is_open())
            .unwrap_or(false)
    }

    /// Stop sampling. Idempotent; a tick already scheduled is discarded.
    pub fn cancel(&self) {
        let Some(sampler) = &self.sampler else {
            return;
        };
        if sampler.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }

        sampler.gate.close();
        if let Some(task) = sampler.task.lock().take() {
            task.abort();
        }
        tracing::debug!("Bandwidth estimation cancelled");
    }
}

impl Drop for EstimatorHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for EstimatorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EstimatorHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Throughput in Mbps between two counter readings over `interval`
fn delta_mbps(previous: u64, current: u64, interval: Duration) -> f64 {
    let bits = (current as f64 - previous as f64) * 8.0;
    bits / 1_000_000.0 / interval.as_secs_f64()
}

enum Tick {
    Continue(u64),
    Stop,
}

/// Take one sample while holding the gate
fn sample<F>(
    gate: &Gate,
    media: &dyn MediaSource,
    previous: Option<u64>,
    interval: Duration,
    on_estimate: &F,
) -> Tick
where
    F: Fn(BandwidthEstimate),
{
    let open = gate.enter();
    if !open.get() {
        return Tick::Stop;
    }

    let current = match media.bytes_decoded() {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Stopping bandwidth estimation, counter read failed: {}", e);
            open.set(false);
            return Tick::Stop;
        }
    };

    if let Some(previous) = previous {
        let mbps = delta_mbps(previous, current, interval);
        // Counter resets and decoder stalls show up as non-positive deltas
        if mbps > 0.0 {
            tracing::trace!("Estimated {:.2} Mbps from decoded bytes", mbps);
            on_estimate(BandwidthEstimate {
                mbps,
                sampled_at: Utc::now(),
            });
        }
    }

    Tick::Continue(current)
}

/// Sample `media` every `interval` and report positive throughput estimates.
///
/// Needs a tokio runtime; without one an inert handle is returned. The first
/// failed counter read stops sampling for good.
pub fn estimate_bandwidth_from_media<F>(
    media: Arc<dyn MediaSource>,
    interval: Duration,
    on_estimate: F,
) -> EstimatorHandle
where
    F: Fn(BandwidthEstimate) + Send + Sync + 'static,
{
    let runtime = match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::warn!("No async runtime, bandwidth estimation disabled: {}", e);
            return EstimatorHandle::inert();
        }
    };

    let interval = if interval.is_zero() {
        tracing::warn!("Zero sample interval, using {:?}", DEFAULT_SAMPLE_INTERVAL);
        DEFAULT_SAMPLE_INTERVAL
    } else {
        interval
    };

    let gate = Arc::new(Gate::new());
    let task_gate = Arc::clone(&gate);

    let task = runtime.spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut previous = None;

        loop {
            ticker.tick().await;
            match sample(&task_gate, media.as_ref(), previous, interval, &on_estimate) {
                Tick::Continue(bytes) => previous = Some(bytes),
                Tick::Stop => break,
            }
        }
    });

    tracing::debug!("Bandwidth estimation started every {:?}", interval);

    EstimatorHandle {
        sampler: Some(Sampler {
            gate,
            cancelled: AtomicBool::new(false),
            task: Mutex::new(Some(task)),
        }),
    }
}
