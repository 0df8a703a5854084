//! Error handling for the voting machine

use crate::types::RegistrationId;

/// Result type alias for the voting machine
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the voting machine
///
/// Every domain variant is an expected, recoverable outcome of an
/// operation. The console reports it and carries on.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Candidate or voter added while the election is running
    #[error("Cannot change candidates or voters while the election is active")]
    ElectionActive,

    /// Voting or authentication attempted while no election is running
    #[error("Election is not currently active")]
    ElectionInactive,

    /// Candidate name collides (case-insensitively) with an existing one
    #[error("Candidate '{name}' already exists")]
    DuplicateCandidate { name: String },

    /// Fingerprint already registered to another voter
    #[error("This fingerprint is already registered to {owner}")]
    DuplicateVoter { owner: String },

    /// Blank fingerprint supplied at registration
    #[error("Fingerprint ID cannot be empty")]
    EmptyIdentifier,

    /// No voter is registered under the supplied fingerprint
    #[error("Fingerprint not recognized")]
    UnrecognizedIdentifier,

    /// Voter authenticated but has already cast a vote
    #[error("Voter {name} (ID: {registration_id}) has already voted")]
    AlreadyVoted {
        name: String,
        registration_id: RegistrationId,
    },

    /// Election start attempted without candidates
    #[error("No candidates have been added")]
    NoCandidates,

    /// Election start attempted without registered voters
    #[error("No voters have been registered")]
    NoVoters,

    /// Candidate choice out of range or not a number
    #[error("Invalid candidate selection: '{selection}'")]
    InvalidSelection { selection: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Console I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the caller may report this failure and continue
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Io(_) | Self::Internal { .. } | Self::Config { .. } | Self::Serialization(_)
        )
    }
}

/// Convenience macro for formatted internal errors
#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::Error::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::internal(format!($fmt, $($arg)*))
    };
}
