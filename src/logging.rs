use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies (normally
/// `AppConfig.log_level`). Safe to call more than once — later calls are
/// no-ops, which keeps test harnesses simple.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt().with_env_filter(filter).try_init();
}
