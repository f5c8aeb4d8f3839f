//! Network probe
//!
//! Reads the host's connectivity snapshot and formats it for display.

use super::signal::{ConnectionCategory, NetworkSignal};
use super::source::ConnectivitySource;

/// Read the current connectivity.
///
/// Returns the fully-unknown signal when no source exists or the source has
/// nothing to report.
pub fn read_signal(source: Option<&dyn ConnectivitySource>) -> NetworkSignal {
    match source.and_then(|s| s.snapshot()) {
        Some(signal) => signal,
        None => {
            tracing::trace!("No connectivity information available");
            NetworkSignal::unknown()
        }
    }
}

/// Describe a signal for display, e.g. `"Data saver · 4G · 3.2 Mbps"`
pub fn describe(signal: &NetworkSignal) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(3);

    if signal.data_saver_enabled {
        parts.push("Data saver".to_string());
    }

    let connection = if signal.connection_category.is_fixed_line() {
        signal.connection_category.label()
    } else {
        signal
            .effective_speed_class
            .label()
            .or_else(|| match signal.connection_category {
                ConnectionCategory::Cellular => signal.connection_category.label(),
                _ => None,
            })
    };
    if let Some(label) = connection {
        parts.push(label.to_string());
    }

    if let Some(mbps) = signal.downlink() {
        parts.push(format!("{:.1} Mbps", mbps));
    }

    if parts.is_empty() {
        return "Unknown connection".to_string();
    }
    parts.join(" · ")
}
