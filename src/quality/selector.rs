//! Quality selection policy
//!
//! Rules are evaluated in order and the first match wins. Data saver outranks
//! entitlement, a classified speed outranks a raw downlink estimate, and the
//! connection category is the last resort.

use super::tier::QualityTier;
use crate::network::signal::{EffectiveSpeedClass, NetworkSignal};

/// Downlink bands in Mbps, lower bounds inclusive
const DOWNLINK_LOW_MAX: f64 = 1.5;
const DOWNLINK_MEDIUM_MAX: f64 = 5.0;
const DOWNLINK_HIGH_MAX: f64 = 10.0;

/// The policy rule that produced a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRule {
    NoSignal,
    DataSaver,
    SpeedClass,
    Downlink,
    ConnectionCategory,
}

/// Choose a tier for the given connectivity and entitlement
pub fn select_quality(signal: &NetworkSignal, premium: bool) -> QualityTier {
    select_quality_with_rule(signal, premium).0
}

/// Like `select_quality`, also reporting which rule decided
pub fn select_quality_with_rule(
    signal: &NetworkSignal,
    premium: bool,
) -> (QualityTier, SelectionRule) {
    let pick = |premium_tier, free_tier| if premium { premium_tier } else { free_tier };

    let decision = if signal.is_unknown() {
        (pick(QualityTier::High, QualityTier::Medium), SelectionRule::NoSignal)
    } else if signal.data_saver_enabled {
        (QualityTier::Low, SelectionRule::DataSaver)
    } else if let Some(tier) = tier_for_speed_class(signal.effective_speed_class, premium) {
        (tier, SelectionRule::SpeedClass)
    } else if let Some(mbps) = signal.downlink() {
        (tier_for_downlink(mbps, premium), SelectionRule::Downlink)
    } else if signal.connection_category.is_fixed_line() {
        (
            pick(QualityTier::High, QualityTier::Medium),
            SelectionRule::ConnectionCategory,
        )
    } else {
        (
            pick(QualityTier::Medium, QualityTier::Low),
            SelectionRule::ConnectionCategory,
        )
    };

    tracing::trace!(
        "Selected {} via {:?} (premium={}) for {:?}",
        decision.0,
        decision.1,
        premium,
        signal
    );
    decision
}

fn tier_for_speed_class(class: EffectiveSpeedClass, premium: bool) -> Option<QualityTier> {
    let tier = match class {
        EffectiveSpeedClass::Slow2g | EffectiveSpeedClass::G2 => QualityTier::Low,
        EffectiveSpeedClass::G3 if premium => QualityTier::Medium,
        EffectiveSpeedClass::G3 => QualityTier::Low,
        EffectiveSpeedClass::G4 | EffectiveSpeedClass::G5 if premium => QualityTier::High,
        EffectiveSpeedClass::G4 | EffectiveSpeedClass::G5 => QualityTier::Medium,
        EffectiveSpeedClass::Unknown => return None,
    };
    Some(tier)
}

fn tier_for_downlink(mbps: f64, premium: bool) -> QualityTier {
    match (mbps, premium) {
        (x, _) if x < DOWNLINK_LOW_MAX => QualityTier::Low,
        (x, true) if x < DOWNLINK_MEDIUM_MAX => QualityTier::Medium,
        (x, false) if x < DOWNLINK_MEDIUM_MAX => QualityTier::Low,
        (x, true) if x < DOWNLINK_HIGH_MAX => QualityTier::High,
        (x, false) if x < DOWNLINK_HIGH_MAX => QualityTier::Medium,
        (_, true) => QualityTier::Hd,
        (_, false) => QualityTier::High,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::signal::ConnectionCategory;
    use crate::quality::tier::{to_constraint, to_estimated_bitrate};
    use proptest::prelude::*;

    fn signal(
        category: ConnectionCategory,
        class: EffectiveSpeedClass,
        downlink: f64,
        saver: bool,
    ) -> NetworkSignal {
        NetworkSignal::new(category, class, Some(downlink), saver)
    }

    #[test]
    fn test_wifi_fast_downlink_premium_gets_hd() {
        let s = signal(ConnectionCategory::Wifi, EffectiveSpeedClass::Unknown, 12.0, false);
        let tier = select_quality(&s, true);
        assert_eq!(tier, QualityTier::Hd);
        assert_eq!(to_constraint(tier).to_string(), "1920x1080@30");
        assert_eq!(to_estimated_bitrate(tier), 5000);
    }

    #[test]
    fn test_cellular_3g_free_gets_low() {
        let s = signal(ConnectionCategory::Cellular, EffectiveSpeedClass::G3, 0.0, false);
        assert_eq!(select_quality(&s, false), QualityTier::Low);
        assert_eq!(select_quality(&s, true), QualityTier::Medium);
    }

    #[test]
    fn test_data_saver_overrides_premium() {
        let s = signal(ConnectionCategory::Unknown, EffectiveSpeedClass::Unknown, 0.0, true);
        assert_eq!(
            select_quality_with_rule(&s, true),
            (QualityTier::Low, SelectionRule::DataSaver)
        );
    }

    #[test]
    fn test_no_signal_defaults() {
        let s = NetworkSignal::unknown();
        assert_eq!(select_quality(&s, false), QualityTier::Medium);
        assert_eq!(
            select_quality_with_rule(&s, true),
            (QualityTier::High, SelectionRule::NoSignal)
        );
    }

    #[test]
    fn test_speed_classes() {
        let at = |class, premium| {
            select_quality(&signal(ConnectionCategory::Cellular, class, 50.0, false), premium)
        };
        assert_eq!(at(EffectiveSpeedClass::Slow2g, true), QualityTier::Low);
        assert_eq!(at(EffectiveSpeedClass::G2, true), QualityTier::Low);
        assert_eq!(at(EffectiveSpeedClass::G4, false), QualityTier::Medium);
        assert_eq!(at(EffectiveSpeedClass::G5, true), QualityTier::High);
    }

    #[test]
    fn test_speed_class_outranks_downlink() {
        let s = signal(ConnectionCategory::Wifi, EffectiveSpeedClass::G2, 100.0, false);
        assert_eq!(
            select_quality_with_rule(&s, true),
            (QualityTier::Low, SelectionRule::SpeedClass)
        );
    }

    #[test]
    fn test_downlink_band_edges() {
        let at = |mbps, premium| {
            select_quality(
                &signal(ConnectionCategory::Unknown, EffectiveSpeedClass::Unknown, mbps, false),
                premium,
            )
        };
        assert_eq!(at(1.49, true), QualityTier::Low);
        assert_eq!(at(1.5, true), QualityTier::Medium);
        assert_eq!(at(1.5, false), QualityTier::Low);
        assert_eq!(at(4.99, true), QualityTier::Medium);
        assert_eq!(at(5.0, true), QualityTier::High);
        assert_eq!(at(5.0, false), QualityTier::Medium);
        assert_eq!(at(9.99, false), QualityTier::Medium);
        assert_eq!(at(10.0, true), QualityTier::Hd);
        assert_eq!(at(10.0, false), QualityTier::High);
    }

    #[test]
    fn test_category_fallback() {
        let at = |category, premium| {
            select_quality(
                &NetworkSignal::new(category, EffectiveSpeedClass::Unknown, None, false),
                premium,
            )
        };
        assert_eq!(at(ConnectionCategory::Ethernet, true), QualityTier::High);
        assert_eq!(at(ConnectionCategory::Wifi, false), QualityTier::Medium);
        assert_eq!(at(ConnectionCategory::Cellular, true), QualityTier::Medium);
        assert_eq!(at(ConnectionCategory::Cellular, false), QualityTier::Low);
    }

    fn any_category() -> impl Strategy<Value = ConnectionCategory> {
        prop_oneof![
            Just(ConnectionCategory::Wifi),
            Just(ConnectionCategory::Ethernet),
            Just(ConnectionCategory::Cellular),
            Just(ConnectionCategory::Unknown),
        ]
    }

    fn any_speed_class() -> impl Strategy<Value = EffectiveSpeedClass> {
        prop_oneof![
            Just(EffectiveSpeedClass::Slow2g),
            Just(EffectiveSpeedClass::G2),
            Just(EffectiveSpeedClass::G3),
            Just(EffectiveSpeedClass::G4),
            Just(EffectiveSpeedClass::G5),
            Just(EffectiveSpeedClass::Unknown),
        ]
    }

    fn any_signal() -> impl Strategy<Value = NetworkSignal> {
        (
            any_category(),
            any_speed_class(),
            proptest::option::of(0.0f64..200.0),
            any::<bool>(),
        )
            .prop_map(|(category, class, downlink, saver)| {
                NetworkSignal::new(category, class, downlink, saver)
            })
    }

    proptest! {
        #[test]
        fn prop_data_saver_always_low(mut s in any_signal(), premium in any::<bool>()) {
            s.data_saver_enabled = true;
            prop_assert_eq!(select_quality(&s, premium), QualityTier::Low);
        }

        #[test]
        fn prop_free_never_hd(s in any_signal()) {
            prop_assert_ne!(select_quality(&s, false), QualityTier::Hd);
        }

        #[test]
        fn prop_premium_never_below_free(s in any_signal()) {
            prop_assert!(select_quality(&s, true) >= select_quality(&s, false));
        }

        #[test]
        fn prop_selection_is_deterministic(s in any_signal(), premium in any::<bool>()) {
            prop_assert_eq!(select_quality(&s, premium), select_quality(&s, premium));
        }
    }
}
