//! Tracing subscriber setup.

use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Maps a `-v` count to the most verbose level that is emitted.
///
/// Status reporting happens at `INFO`, so that is the floor.
pub const fn verbosity_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global tracing subscriber.
///
/// Directives from `env_filter`, or from `RUST_LOG` when none is given, are combined with the
/// level derived from `verbosity`.
pub fn init_tracing_subscriber(
    verbosity: u8,
    env_filter: Option<impl Into<EnvFilter>>,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = env_filter.map_or_else(EnvFilter::from_default_env, Into::into);
    let filter = filter.add_directive(verbosity_level(verbosity).into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(filter)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Level::INFO)]
    #[case(1, Level::DEBUG)]
    #[case(2, Level::TRACE)]
    #[case(9, Level::TRACE)]
    fn test_verbosity_level(#[case] verbosity: u8, #[case] expected: Level) {
        assert_eq!(verbosity_level(verbosity), expected);
    }
}
