//! Log subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Events go to stderr so stdout can carry generated bindings. `RUST_LOG`
/// applies when no `-v` flag is given; otherwise the flag count picks the level.
pub fn init(verbosity: u8) {
    let env_filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
