//! Fingerprint Voting Machine
//!
//! Registers candidates and voters, runs an election session, checks
//! voters by a hashed fingerprint identifier and records one vote per
//! voter.

pub mod config;
pub mod console;
pub mod crypto;
pub mod election;
pub mod errors;
pub mod types;

// Re-export commonly used types
pub use election::{ElectionSession, SharedElection};
pub use errors::{Error, Result};

use config::{LogFormat, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with default settings
pub fn init() -> Result<()> {
    init_logging(&LoggingConfig {
        level: "fpvote=info".to_string(),
        format: LogFormat::Full,
    })
}

/// Initialize logging from configuration
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to
/// stderr so they never mix with the console on stdout.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.level))
        .map_err(|e| Error::config(format!("Invalid log level '{}': {e}", config.level)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Full => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };
    installed.map_err(|e| internal_error!("Logging already initialized: {}", e))?;

    tracing::info!("🗳️  Fingerprint voting machine v{} initialized", VERSION);
    Ok(())
}
