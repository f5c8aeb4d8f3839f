//! Host platform selection
//!
//! Chosen once at startup and passed explicitly to whatever needs it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform the client runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Web,
}

impl Platform {
    /// Platform of the compile target. Anything that is not a native mobile
    /// build is treated as a web host.
    pub fn detect() -> Self {
        if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else {
            Platform::Web
        }
    }

    /// Whether the media pipeline exposes decoded-byte counters
    pub fn supports_media_byte_counters(&self) -> bool {
        matches!(self, Platform::Web)
    }

    /// Native mobile build
    pub fn is_native(&self) -> bool {
        matches!(self, Platform::Ios | Platform::Android)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::Web => "web",
        };
        f.write_str(name)
    }
}
