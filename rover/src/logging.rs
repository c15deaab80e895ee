use tracing_subscriber::{EnvFilter, fmt};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` decides the filter, falling back to `info`. `verbose` forces
/// `debug`. Records emitted through the `log` facade by the library crates
/// are forwarded too. Calling this twice is harmless.
///
/// ```
/// rover::init_logging(false);
/// ```
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = fmt().with_env_filter(filter).try_init();
}
