//! Logging setup and operator output

use fxpack_common::Cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global `tracing` subscriber. `RUST_LOG` wins over the
/// verbosity flags. Diagnostics go to stderr so stdout stays parseable.
pub fn init_logging(settings: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fxpack={}", settings.log_directive())));

    // A second init (tests, embedding) is not an error worth surfacing.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

/// Print an operator-facing line unless `--quiet` is set.
pub fn say(settings: &Cli, msg: &str) {
    if !settings.is_quiet() {
        println!("{msg}");
    }
}

/// Print a line only with `--verbose`.
pub fn detail(settings: &Cli, msg: &str) {
    if settings.is_verbose() {
        println!("{msg}");
    }
}
