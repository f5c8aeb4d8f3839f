//! Change notifier
//!
//! Bridges connectivity change events to repeated quality selection. Each
//! subscription owns its listener registration and releases it on `cancel`
//! or drop.

use super::gate::Gate;
use super::signal::NetworkSignal;
use super::source::{ChangeListener, ConnectivitySource, ListenerId};
use crate::quality::selector::select_quality;
use crate::quality::tier::QualityTier;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Callback receiving each re-selected tier
pub type QualityCallback = Arc<dyn Fn(QualityTier) + Send + Sync>;

/// Options for a subscription
#[derive(Debug, Clone, Copy, Default)]
pub struct NotifierOptions {
    /// Skip callbacks when the tier equals the previously delivered one
    pub suppress_unchanged: bool,
}

struct Registration {
    source: Arc<dyn ConnectivitySource>,
    listener: ListenerId,
    gate: Arc<Gate>,
    cancelled: AtomicBool,
}

/// Handle for an active quality subscription
#[must_use = "dropping a Subscription cancels it"]
pub struct Subscription {
    registration: Option<Registration>,
}

impl Subscription {
    /// A handle with nothing registered. `cancel` is a no-op.
    pub fn inert() -> Self {
        Self { registration: None }
    }

    /// Whether callbacks can still be delivered
    pub fn is_active(&self) -> bool {
        self.registration
            .as_ref()
            .map(|r| !r.cancelled.load(Ordering::Acquire) && r.gate.is_open())
            .unwrap_or(false)
    }

    /// Stop delivering callbacks and unregister the listener.
    ///
    /// Safe to call any number of times. Once this returns no callback starts.
    pub fn cancel(&self) {
        let Some(registration) = &self.registration else {
            return;
        };
        if registration.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }

        registration.gate.close();
        registration.source.remove_listener(registration.listener);
        tracing::debug!("Quality subscription cancelled");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Subscribe to tier changes with default options.
///
/// `premium` is captured now; re-subscribe when entitlement changes.
pub fn subscribe<F>(
    source: Option<&Arc<dyn ConnectivitySource>>,
    on_quality_change: F,
    premium: bool,
) -> Subscription
where
    F: Fn(QualityTier) + Send + Sync + 'static,
{
    subscribe_with_options(source, on_quality_change, premium, NotifierOptions::default())
}

/// Subscribe to tier changes
pub fn subscribe_with_options<F>(
    source: Option<&Arc<dyn ConnectivitySource>>,
    on_quality_change: F,
    premium: bool,
    options: NotifierOptions,
) -> Subscription
where
    F: Fn(QualityTier) + Send + Sync + 'static,
{
    let Some(source) = source else {
        tracing::debug!("No connectivity source, quality subscription is inert");
        return Subscription::inert();
    };

    let gate = Arc::new(Gate::new());
    let callback: QualityCallback = Arc::new(on_quality_change);
    let last_tier: Arc<Mutex<Option<QualityTier>>> = Arc::new(Mutex::new(None));

    let listener_gate = Arc::clone(&gate);
    let listener: ChangeListener = Arc::new(move |signal: NetworkSignal| {
        let open = listener_gate.enter();
        if !open.get() {
            return;
        }

        let tier = select_quality(&signal, premium);
        if options.suppress_unchanged {
            let mut last = last_tier.lock();
            if *last == Some(tier) {
                tracing::trace!("Tier unchanged at {}, skipping notification", tier);
                return;
            }
            *last = Some(tier);
        }

        tracing::debug!("Connectivity change selected tier {}", tier);
        callback(tier);
    });

    match source.add_listener(listener) {
        Ok(id) => {
            tracing::debug!("Quality subscription registered (premium={})", premium);
            Subscription {
                registration: Some(Registration {
                    source: Arc::clone(source),
                    listener: id,
                    gate,
                    cancelled: AtomicBool::new(false),
                }),
            }
        }
        Err(e) => {
            tracing::warn!("Failed to register connectivity listener: {}", e);
            Subscription::inert()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::signal::{ConnectionCategory, EffectiveSpeedClass};
    use crate::network::source::{NoConnectivity, SharedConnectivity};
    use std::sync::atomic::AtomicUsize;

    fn shared() -> (Arc<SharedConnectivity>, Arc<dyn ConnectivitySource>) {
        let concrete = Arc::new(SharedConnectivity::new());
        let source: Arc<dyn ConnectivitySource> = concrete.clone();
        (concrete, source)
    }

    fn cellular(class: EffectiveSpeedClass) -> NetworkSignal {
        NetworkSignal::new(ConnectionCategory::Cellular, class, None, false)
    }

    fn recorder() -> (Arc<Mutex<Vec<QualityTier>>>, impl Fn(QualityTier) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |tier: QualityTier| sink.lock().push(tier))
    }

    #[test]
    fn test_reselects_on_each_change() {
        let (host, source) = shared();
        let (seen, on_change) = recorder();
        let subscription = subscribe(Some(&source), on_change, false);
        assert!(subscription.is_active());

        host.publish(cellular(EffectiveSpeedClass::G4));
        host.publish(cellular(EffectiveSpeedClass::G2));
        host.publish(cellular(EffectiveSpeedClass::G4));

        assert_eq!(
            *seen.lock(),
            vec![QualityTier::Medium, QualityTier::Low, QualityTier::Medium]
        );
    }

    #[test]
    fn test_entitlement_captured_at_subscribe() {
        let (host, source) = shared();
        let (seen, on_change) = recorder();
        let _subscription = subscribe(Some(&source), on_change, true);

        host.publish(cellular(EffectiveSpeedClass::G5));
        assert_eq!(*seen.lock(), vec![QualityTier::High]);
    }

    #[test]
    fn test_no_callbacks_after_cancel() {
        let (host, source) = shared();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let subscription = subscribe(
            Some(&source),
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            false,
        );

        host.publish(cellular(EffectiveSpeedClass::G3));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        subscription.cancel();
        subscription.cancel();
        assert!(!subscription.is_active());
        assert_eq!(host.listener_count(), 0);

        for _ in 0..3 {
            host.publish(cellular(EffectiveSpeedClass::G4));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_unregisters() {
        let (host, source) = shared();
        let subscription = subscribe(Some(&source), |_| {}, false);
        assert_eq!(host.listener_count(), 1);
        drop(subscription);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_cancel_from_inside_callback() {
        let (host, source) = shared();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let calls = Arc::new(AtomicUsize::new(0));

        let inner_slot = slot.clone();
        let counter = calls.clone();
        let subscription = subscribe(
            Some(&source),
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                if let Some(sub) = inner_slot.lock().as_ref() {
                    sub.cancel();
                }
            },
            false,
        );
        *slot.lock() = Some(subscription);

        host.publish(cellular(EffectiveSpeedClass::G4));
        host.publish(cellular(EffectiveSpeedClass::G4));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_suppress_unchanged_tiers() {
        let (host, source) = shared();
        let (seen, on_change) = recorder();
        let _subscription = subscribe_with_options(
            Some(&source),
            on_change,
            false,
            NotifierOptions {
                suppress_unchanged: true,
            },
        );

        host.publish(cellular(EffectiveSpeedClass::G4));
        host.publish(cellular(EffectiveSpeedClass::G5));
        host.publish(cellular(EffectiveSpeedClass::G2));

        assert_eq!(*seen.lock(), vec![QualityTier::Medium, QualityTier::Low]);
    }

    #[test]
    fn test_missing_source_is_inert() {
        let subscription = subscribe(None, |_| {}, true);
        assert!(!subscription.is_active());
        subscription.cancel();
    }

    #[test]
    fn test_registration_failure_is_inert() {
        let source: Arc<dyn ConnectivitySource> = Arc::new(NoConnectivity);
        let subscription = subscribe(Some(&source), |_| {}, true);
        assert!(!subscription.is_active());
        subscription.cancel();
    }
}
