use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the process-wide tracing subscriber.
///
/// Filtering is controlled via `RUST_LOG`; without it, the given service
/// (plus this crate and the HTTP layer) logs at debug level. Call once at
/// startup, before the server starts accepting requests.
pub fn init(service: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!(
                "{service}=debug,weather_core=debug,tower_http=debug"
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
