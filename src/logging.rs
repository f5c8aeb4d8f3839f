//! Tracing setup

use crate::config::DEFAULT_LOG_FILTER;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// RUST_LOG wins over `filter`, which wins over the crate default. Calling
/// this again after a subscriber is installed does nothing.
pub fn init_tracing(filter: Option<&str>) {
    let fallback = filter.unwrap_or(DEFAULT_LOG_FILTER).to_string();

    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_ok() {
        tracing::info!("StrangerWave media v{}", env!("CARGO_PKG_VERSION"));
    }
}
