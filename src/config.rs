//! Configuration management for the voting machine
//!
//! Loads settings from environment variables (and a `.env` file if
//! present) with validation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Digest used to turn raw fingerprints into stored keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Blake3,
    Sha256,
}

impl std::str::FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blake3" => Ok(Self::Blake3),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            other => Err(Error::config(format!(
                "FPVOTE_HASH_ALGORITHM must be blake3 or sha256, got '{other}'"
            ))),
        }
    }
}

/// Fingerprint hashing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashingConfig {
    pub algorithm: HashAlgorithm,

    /// Optional key for keyed BLAKE3 (base64 encoded, minimum 32 bytes)
    pub fingerprint_salt: Option<String>,
}

impl HashingConfig {
    /// Validate a base64-encoded salt
    fn validate_salt(salt: &str, name: &str) -> Result<()> {
        use base64::Engine;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(salt)
            .map_err(|_| Error::config(format!("{name} must be valid base64")))?;

        if decoded.len() < 32 {
            return Err(Error::config(format!(
                "{name} must be at least 32 bytes when decoded"
            )));
        }

        Ok(())
    }

    /// Get the first 32 salt bytes, if a salt is configured
    pub fn salt_key(&self) -> Result<Option<[u8; 32]>> {
        use base64::Engine;
        let Some(salt) = &self.fingerprint_salt else {
            return Ok(None);
        };

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(salt)
            .map_err(|_| Error::config("Invalid fingerprint salt"))?;
        let key: [u8; 32] = decoded
            .get(..32)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| Error::config("Fingerprint salt shorter than 32 bytes"))?;

        Ok(Some(key))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Output style of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    Full,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            other => Err(Error::config(format!(
                "FPVOTE_LOG_FORMAT must be full or compact, got '{other}'"
            ))),
        }
    }
}

/// Console front-end configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Clear the terminal before showing the outcome of a menu choice
    pub clear_screen: bool,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub hashing: HashingConfig,
    pub logging: LoggingConfig,
    pub console: ConsoleConfig,
}

impl Config {
    /// Load configuration from environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let algorithm = lookup("FPVOTE_HASH_ALGORITHM")
            .map(|value| value.parse::<HashAlgorithm>())
            .transpose()?
            .unwrap_or(HashAlgorithm::Blake3);

        let fingerprint_salt = lookup("FPVOTE_FINGERPRINT_SALT").filter(|s| !s.is_empty());
        if let Some(salt) = &fingerprint_salt {
            HashingConfig::validate_salt(salt, "FPVOTE_FINGERPRINT_SALT")?;
            if algorithm != HashAlgorithm::Blake3 {
                return Err(Error::config(
                    "FPVOTE_FINGERPRINT_SALT requires FPVOTE_HASH_ALGORITHM=blake3",
                ));
            }
        }

        let logging = LoggingConfig {
            level: lookup("FPVOTE_LOG_LEVEL").unwrap_or_else(|| "fpvote=info".to_string()),
            format: lookup("FPVOTE_LOG_FORMAT")
                .map(|value| value.parse::<LogFormat>())
                .transpose()?
                .unwrap_or(LogFormat::Full),
        };

        let clear_screen = match lookup("FPVOTE_CLEAR_SCREEN") {
            None => true,
            Some(value) => value
                .trim()
                .parse::<bool>()
                .map_err(|_| Error::config("Invalid FPVOTE_CLEAR_SCREEN"))?,
        };

        Ok(Self {
            hashing: HashingConfig {
                algorithm,
                fingerprint_salt,
            },
            logging,
            console: ConsoleConfig { clear_screen },
        })
    }

    /// Create configuration for testing
    pub fn for_testing() -> Result<Self> {
        use base64::Engine;
        // Generate a random salt for testing
        let salt = base64::engine::general_purpose::STANDARD.encode(rand::random::<[u8; 32]>());

        Ok(Self {
            hashing: HashingConfig {
                algorithm: HashAlgorithm::Blake3,
                fingerprint_salt: Some(salt),
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Compact,
            },
            console: ConsoleConfig {
                clear_screen: false,
            },
        })
    }
}
