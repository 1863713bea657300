#![forbid(unsafe_code)]

//! Structured logging bootstrap.
//!
//! All crates in the workspace emit `tracing` events whose `message` is a
//! dotted name (`fitwidth.probe.measured`, `fitwidth.notify.spurious`, ...).
//! Libraries never install a subscriber themselves; applications either bring
//! their own or call [`init`] (feature `tracing-json`) for JSON lines filtered
//! by `FITWIDTH_LOG`.

/// Environment variable holding the `EnvFilter` directive for [`init`].
pub const ENV_LOG: &str = "FITWIDTH_LOG";

/// Default filter used when `FITWIDTH_LOG` is unset.
pub const DEFAULT_FILTER: &str = "fitwidth=info,warn";

/// Install a global JSON subscriber writing to stderr.
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
