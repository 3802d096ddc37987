use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over the `info` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
