//! # Core Types for the Fingerprint Voting Machine
//!
//! Records owned by an [`ElectionSession`](crate::election::ElectionSession)
//! and the read-only reports it produces.
//!
//! ## Type Categories
//!
//! ### Identifiers
//! - [`CandidateId`]: sequential candidate number, starting at 1
//! - [`RegistrationId`]: sequential voter registration number, starting at 1
//! - [`FingerprintKey`]: stored digest of a raw fingerprint identifier
//!
//! ### Records
//! - [`Candidate`]: ballot entry with its running vote count
//! - [`Voter`]: registered voter and their has-voted flag
//!
//! ### Reports
//! - [`ResultsReport`] / [`Standing`]: tally ordered by votes
//! - [`VoterStatus`]: per-voter participation
//!
//! ## Usage Examples
//!
//! ```rust
//! use fpvote::election::ElectionSession;
//!
//! let mut session = ElectionSession::default();
//! let alice = session.add_candidate("Alice").unwrap();
//! assert_eq!(alice.id, 1);
//! assert_eq!(alice.to_string(), "ID: 1, Name: Alice, Votes: 0");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Sequential candidate identifier
pub type CandidateId = u32;

/// Sequential voter registration identifier
pub type RegistrationId = u32;

/// Digest of a raw fingerprint identifier
///
/// The natural key for voter lookup. Raw identifiers are never stored;
/// two identifiers are the same fingerprint exactly when their keys are
/// equal. Equality is evaluated in constant time.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FingerprintKey(String);

impl FingerprintKey {
    /// Wrap an already-rendered digest
    pub fn from_digest(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// The full hex digest
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix used in log lines
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl PartialEq for FingerprintKey {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        let (a, b) = (self.0.as_bytes(), other.0.as_bytes());
        a.len() == b.len() && bool::from(a.ct_eq(b))
    }
}

impl Hash for FingerprintKey {
    fn hash<S: Hasher>(&self, state: &mut S) {
        self.0.hash(state);
    }
}

impl fmt::Display for FingerprintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle phase of an election session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionPhase {
    /// Election inactive; candidates and voters may be added
    Setup,
    /// Election running; votes may be cast
    Active,
}

/// A ballot entry
///
/// Created only while the election is inactive and never removed. The
/// vote count only ever grows, one vote at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Sequential identifier, starting at 1
    pub id: CandidateId,

    /// Display name, unique among candidates ignoring case
    pub name: String,

    /// Votes received so far
    pub vote_count: u64,
}

impl Candidate {
    pub(crate) fn new(id: CandidateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            vote_count: 0,
        }
    }

    /// Case-insensitive name comparison
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {}, Name: {}, Votes: {}", self.id, self.name, self.vote_count)
    }
}

/// A registered voter
///
/// Names are cosmetic and may repeat; the fingerprint key is what
/// identifies a voter. `has_voted` flips to `true` once and never back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voter {
    /// Sequential registration number, starting at 1
    pub registration_id: RegistrationId,

    /// Display name
    pub name: String,

    /// Digest of the fingerprint supplied at registration
    pub fingerprint: FingerprintKey,

    /// Whether this voter has cast their vote
    pub has_voted: bool,

    /// When the voter was registered
    pub registered_at: DateTime<Utc>,

    /// When the vote was cast, if it has been
    pub voted_at: Option<DateTime<Utc>>,
}

impl Voter {
    pub(crate) fn new(
        registration_id: RegistrationId,
        name: impl Into<String>,
        fingerprint: FingerprintKey,
    ) -> Self {
        Self {
            registration_id,
            name: name.into(),
            fingerprint,
            has_voted: false,
            registered_at: Utc::now(),
            voted_at: None,
        }
    }

    pub(crate) fn mark_voted(&mut self) {
        self.has_voted = true;
        self.voted_at = Some(Utc::now());
    }
}

impl fmt::Display for Voter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Has Voted: {}",
            self.registration_id, self.name, self.has_voted
        )
    }
}

/// One line of the election results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub candidate_id: CandidateId,
    pub name: String,
    pub votes: u64,
}

/// Tally of all candidates, most votes first
///
/// Candidates with equal votes keep their id order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsReport {
    /// Sum of every candidate's votes
    pub total_votes: u64,

    /// Candidates sorted by votes, descending
    pub standings: Vec<Standing>,
}

impl ResultsReport {
    /// Share of the total for a standing, in percent
    ///
    /// Returns `0.0` when no votes have been cast.
    pub fn percentage(&self, standing: &Standing) -> f64 {
        if self.total_votes == 0 {
            0.0
        } else {
            standing.votes as f64 * 100.0 / self.total_votes as f64
        }
    }

    /// Render the report as JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Participation line for one registered voter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoterStatus {
    pub registration_id: RegistrationId,
    pub name: String,
    pub has_voted: bool,
}

impl fmt::Display for VoterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.has_voted { "Voted" } else { "Not Voted" };
        write!(f, "{} (Reg ID: {}): {}", self.name, self.registration_id, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_candidate_name_matching() {
        let candidate = Candidate::new(1, "Alice");
        assert!(candidate.has_name("alice"));
        assert!(candidate.has_name("ALICE"));
        assert!(!candidate.has_name("Alicia"));
    }

    #[test]
    fn test_record_rendering() {
        let candidate = Candidate::new(2, "Bob");
        assert_eq!(candidate.to_string(), "ID: 2, Name: Bob, Votes: 0");

        let voter = Voter::new(1, "Sam", FingerprintKey::from_digest("ab".repeat(32)));
        assert_eq!(voter.to_string(), "ID: 1, Name: Sam, Has Voted: false");

        let status = VoterStatus {
            registration_id: 1,
            name: "Sam".to_string(),
            has_voted: true,
        };
        assert_eq!(status.to_string(), "Sam (Reg ID: 1): Voted");
    }

    #[test]
    fn test_mark_voted_sets_timestamp() {
        let mut voter = Voter::new(1, "Sam", FingerprintKey::from_digest("00"));
        assert!(voter.voted_at.is_none());
        voter.mark_voted();
        assert!(voter.has_voted);
        assert!(voter.voted_at.is_some());
    }

    #[test]
    fn test_fingerprint_key_equality_and_hashing() {
        let a = FingerprintKey::from_digest("deadbeefcafe");
        let b = FingerprintKey::from_digest("deadbeefcafe");
        let c = FingerprintKey::from_digest("deadbeef");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.short(), "deadbeef");
        assert_eq!(FingerprintKey::from_digest("abc").short(), "abc");

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_percentage() {
        let report = ResultsReport {
            total_votes: 4,
            standings: vec![
                Standing {
                    candidate_id: 1,
                    name: "Alice".to_string(),
                    votes: 3,
                },
                Standing {
                    candidate_id: 2,
                    name: "Bob".to_string(),
                    votes: 1,
                },
            ],
        };
        assert_eq!(report.percentage(&report.standings[0]), 75.0);
        assert_eq!(report.percentage(&report.standings[1]), 25.0);

        let empty = ResultsReport {
            total_votes: 0,
            standings: vec![],
        };
        let zero = Standing {
            candidate_id: 1,
            name: "Alice".to_string(),
            votes: 0,
        };
        assert_eq!(empty.percentage(&zero), 0.0);
    }

    #[test]
    fn test_report_json() {
        let report = ResultsReport {
            total_votes: 1,
            standings: vec![Standing {
                candidate_id: 1,
                name: "Alice".to_string(),
                votes: 1,
            }],
        };
        let json = report.to_json().unwrap();
        let parsed: ResultsReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
