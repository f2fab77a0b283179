use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging.
/// - JSON lines on stderr, so stdout stays free for command output
/// - RUST_LOG respected; default to "info,wxlog=debug"
pub fn init(service_name: &str) {
    let default_filter = "info,wxlog=debug";
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());

    tracing_subscriber::registry()
        .with(EnvFilter::new(env_filter))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    tracing::info!(service = %service_name, "Logging initialized");
}
