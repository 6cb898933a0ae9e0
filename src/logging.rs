//! Console logging for the `chatscrub` binary.
//!
//! The library itself only emits `tracing` events; nothing is printed unless
//! a subscriber is installed. The CLI installs one with [`init_cli`].

use tracing_subscriber::EnvFilter;

/// Installs a human-readable stderr subscriber.
///
/// `RUST_LOG` takes precedence. Without it the level is `warn`, or `debug`
/// when `verbose` is set. Calling this twice is a no-op.
pub fn init_cli(verbose: bool) {
    let fallback = if verbose { "chatscrub=debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
