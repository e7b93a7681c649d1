// crates/hee-cli/src/logging.rs

use tracing::Level;

/// Diagnostics go to stderr; stdout carries only command output.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();

    // Only fails if a subscriber is already installed.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
