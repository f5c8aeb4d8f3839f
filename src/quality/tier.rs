//! Quality tiers and the constraint table
//!
//! Each tier maps to one fixed set of capture constraints and one bitrate
//! budget. The table is the only place these numbers live.

use crate::utils::error::{QualityError, QualityResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Video transmission quality tier, ordered by capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// 320x240 @ 15fps
    Low,
    /// 640x480 @ 24fps
    Medium,
    /// 1280x720 @ 30fps
    High,
    /// 1920x1080 @ 30fps, premium only
    Hd,
}

impl QualityTier {
    /// All tiers from lowest to highest
    pub const ALL: [QualityTier; 4] = [
        QualityTier::Low,
        QualityTier::Medium,
        QualityTier::High,
        QualityTier::Hd,
    ];

    /// Get the lowercase name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
            QualityTier::Hd => "hd",
        }
    }

    /// Capture constraints for this tier
    pub fn constraint(&self) -> MediaConstraint {
        to_constraint(*self)
    }

    /// Estimated bitrate for this tier in kbps
    pub fn estimated_bitrate_kbps(&self) -> u32 {
        to_estimated_bitrate(*self)
    }

    /// Parse a tier name, falling back to `Medium` for anything unrecognised.
    ///
    /// Deliberate fallback for hosts that still send free-form names. Strict
    /// callers should use `str::parse` instead.
    #[cfg(feature = "lenient-tiers")]
    pub fn parse_lenient(name: &str) -> Self {
        match name.parse() {
            Ok(tier) => tier,
            Err(_) => {
                tracing::warn!("Unknown quality tier {:?}, falling back to medium", name);
                QualityTier::Medium
            }
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = QualityError;

    fn from_str(s: &str) -> QualityResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(QualityTier::Low),
            "medium" => Ok(QualityTier::Medium),
            "high" => Ok(QualityTier::High),
            "hd" => Ok(QualityTier::Hd),
            _ => Err(QualityError::UnknownTier(s.to_string())),
        }
    }
}

/// Video resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Capture constraints handed to the media pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaConstraint {
    /// Target width in pixels
    pub target_width: u32,

    /// Target height in pixels
    pub target_height: u32,

    /// Frame rate ceiling in fps
    pub max_frame_rate: u32,
}

impl MediaConstraint {
    /// Target resolution
    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.target_width,
            height: self.target_height,
        }
    }
}

impl fmt::Display for MediaConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}@{}",
            self.target_width, self.target_height, self.max_frame_rate
        )
    }
}

/// A tier together with everything derived from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityProfile {
    pub tier: QualityTier,
    pub constraint: MediaConstraint,
    pub bitrate_kbps: u32,
}

impl From<QualityTier> for QualityProfile {
    fn from(tier: QualityTier) -> Self {
        Self {
            tier,
            constraint: to_constraint(tier),
            bitrate_kbps: to_estimated_bitrate(tier),
        }
    }
}

/// Map a tier to its capture constraints
pub fn to_constraint(tier: QualityTier) -> MediaConstraint {
    let (target_width, target_height, max_frame_rate) = match tier {
        QualityTier::Low => (320, 240, 15),
        QualityTier::Medium => (640, 480, 24),
        QualityTier::High => (1280, 720, 30),
        QualityTier::Hd => (1920, 1080, 30),
    };
    MediaConstraint {
        target_width,
        target_height,
        max_frame_rate,
    }
}

/// Map a tier to its estimated transmission bitrate in kbps
pub fn to_estimated_bitrate(tier: QualityTier) -> u32 {
    match tier {
        QualityTier::Low => 300,
        QualityTier::Medium => 1000,
        QualityTier::High => 2500,
        QualityTier::Hd => 5000,
    }
}
