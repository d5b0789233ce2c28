//! Diagnostic output of the binary
//!
//! Events go to stderr so stdout only ever carries the version output.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives, e.g. `git_semver=trace`
pub const LOG_ENV: &str = "GIT_SEMVER_LOG";

/// Directive used when `GIT_SEMVER_LOG` is unset or invalid
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Calling it again is a no-op.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "warn");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn test_init_twice() {
        init_logging(false);
        init_logging(true);
        tracing::debug!("still fine");
    }
}
