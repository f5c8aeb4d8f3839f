//! Connectivity snapshot types

use serde::{Deserialize, Serialize};

/// Physical connection category reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionCategory {
    Wifi,
    Ethernet,
    Cellular,
    #[default]
    Unknown,
}

impl ConnectionCategory {
    /// Wired or WiFi links, trusted for the higher tiers
    pub fn is_fixed_line(&self) -> bool {
        matches!(self, ConnectionCategory::Wifi | ConnectionCategory::Ethernet)
    }

    /// Display label, `None` when unknown
    pub fn label(&self) -> Option<&'static str> {
        match self {
            ConnectionCategory::Wifi => Some("WiFi"),
            ConnectionCategory::Ethernet => Some("Ethernet"),
            ConnectionCategory::Cellular => Some("Cellular"),
            ConnectionCategory::Unknown => None,
        }
    }
}

/// Coarse network quality class as classified by the host or carrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EffectiveSpeedClass {
    #[serde(rename = "slow-2g")]
    Slow2g,
    #[serde(rename = "2g")]
    G2,
    #[serde(rename = "3g")]
    G3,
    #[serde(rename = "4g")]
    G4,
    #[serde(rename = "5g")]
    G5,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl EffectiveSpeedClass {
    /// Parse the host's effective-type string. Unrecognised values are `Unknown`.
    pub fn from_host(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "slow-2g" => EffectiveSpeedClass::Slow2g,
            "2g" => EffectiveSpeedClass::G2,
            "3g" => EffectiveSpeedClass::G3,
            "4g" => EffectiveSpeedClass::G4,
            "5g" => EffectiveSpeedClass::G5,
            _ => EffectiveSpeedClass::Unknown,
        }
    }

    /// Display label, `None` when unknown
    pub fn label(&self) -> Option<&'static str> {
        match self {
            EffectiveSpeedClass::Slow2g => Some("Slow 2G"),
            EffectiveSpeedClass::G2 => Some("2G"),
            EffectiveSpeedClass::G3 => Some("3G"),
            EffectiveSpeedClass::G4 => Some("4G"),
            EffectiveSpeedClass::G5 => Some("5G"),
            EffectiveSpeedClass::Unknown => None,
        }
    }
}

/// Snapshot of the current connectivity.
///
/// Created fresh for each probe or change event and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSignal {
    /// Physical link type
    #[serde(default)]
    pub connection_category: ConnectionCategory,

    /// Effective speed classification
    #[serde(default)]
    pub effective_speed_class: EffectiveSpeedClass,

    /// Downlink estimate in Mbps. Use `downlink()` to read it.
    #[serde(default)]
    downlink_mbps: Option<f64>,

    /// User or OS data-saver preference
    #[serde(default)]
    pub data_saver_enabled: bool,
}

impl NetworkSignal {
    /// Build a signal. Zero, negative and non-finite downlink values are stored as absent.
    pub fn new(
        connection_category: ConnectionCategory,
        effective_speed_class: EffectiveSpeedClass,
        downlink_mbps: Option<f64>,
        data_saver_enabled: bool,
    ) -> Self {
        Self {
            connection_category,
            effective_speed_class,
            downlink_mbps: downlink_mbps.filter(|v| v.is_finite() && *v > 0.0),
            data_saver_enabled,
        }
    }

    /// The signal reported when no connectivity information exists at all
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Downlink estimate in Mbps, `None` when unknown
    pub fn downlink(&self) -> Option<f64> {
        self.downlink_mbps.filter(|v| v.is_finite() && *v > 0.0)
    }

    /// True when every field is at its unknown value and data saver is off
    pub fn is_unknown(&self) -> bool {
        self.connection_category == ConnectionCategory::Unknown
            && self.effective_speed_class == EffectiveSpeedClass::Unknown
            && self.downlink().is_none()
            && !self.data_saver_enabled
    }
}
