//! # Logging Setup
//!
//! The library logs through `tracing`. [`init_logging`] installs a
//! `tracing-subscriber` fmt subscriber for callers that have none: `RUST_LOG`
//! wins when set, otherwise the verbosity flag picks `info` or `error`.
//! An already-installed global subscriber is left in place.

/// Filter directive used when `RUST_LOG` is absent.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "info"
    } else {
        "error"
    }
}

/// Returns `true` when this call installed the global subscriber.
#[cfg(feature = "loggers")]
pub fn init_logging(verbose: bool) -> bool {
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(not(feature = "loggers"))]
pub fn init_logging(_verbose: bool) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_follows_verbosity() {
        assert_eq!(default_directive(true), "info");
        assert_eq!(default_directive(false), "error");
    }

    #[test]
    fn second_init_is_a_no_op() {
        let _ = init_logging(false);
        assert!(!init_logging(true));
    }
}
