//! Utilities: logging setup on top of `tracing`.
//!
//! Key items:
//!   derive_level  (-v / -q -> level)
//!   init_logging  (stderr subscriber; RUST_LOG overrides the derived level)

/// Logging helpers.
pub mod logging {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::filter::LevelFilter;

    /// `-q` wins over any `-v`. Default is warnings only so command output stays clean.
    pub fn derive_level(verbose: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::ERROR;
        }
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Install the global subscriber. Logs go to stderr; stdout carries command output.
    /// A second call is a no-op.
    pub fn init_logging(level: LevelFilter) {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }

}

pub use logging::{derive_level, init_logging};
