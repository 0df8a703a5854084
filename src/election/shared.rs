//! Thread-safe handle to a single election session
//!
//! Authenticate-then-cast is a check-then-act sequence. Every operation
//! here holds one exclusive lock across its whole read-modify-write, so
//! two concurrent votes for the same fingerprint cannot both pass
//! authentication.

use super::ElectionSession;
use crate::crypto::{FingerprintHasher, IdentityHasher};
use crate::types::{Candidate, CandidateId, ResultsReport, Voter, VoterStatus};
use crate::{Result, internal_error};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable, lock-guarded [`ElectionSession`]
pub struct SharedElection<H: IdentityHasher = FingerprintHasher> {
    inner: Arc<Mutex<ElectionSession<H>>>,
}

impl<H: IdentityHasher> Clone for SharedElection<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for SharedElection<FingerprintHasher> {
    fn default() -> Self {
        Self::new(ElectionSession::default())
    }
}

impl<H: IdentityHasher> SharedElection<H> {
    /// Take ownership of a session
    pub fn new(session: ElectionSession<H>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ElectionSession<H>>> {
        self.inner
            .lock()
            .map_err(|_| internal_error!("Election session lock poisoned"))
    }

    /// Run a short closure against the locked session
    pub fn with_session<T>(&self, f: impl FnOnce(&ElectionSession<H>) -> T) -> Result<T> {
        let session = self.lock()?;
        Ok(f(&*session))
    }

    pub fn add_candidate(&self, name: &str) -> Result<Candidate> {
        self.lock()?.add_candidate(name)
    }

    pub fn register_voter(&self, name: &str, raw_identifier: &str) -> Result<Voter> {
        self.lock()?.register_voter(name, raw_identifier)
    }

    pub fn start_election(&self) -> Result<()> {
        self.lock()?.start_election()
    }

    pub fn stop_election(&self) -> Result<()> {
        self.lock()?.stop_election();
        Ok(())
    }

    /// Snapshot of the authenticated voter
    pub fn authenticate_voter(&self, raw_identifier: &str) -> Result<Voter> {
        self.lock()?.authenticate_voter(raw_identifier).cloned()
    }

    pub fn cast_vote(&self, raw_identifier: &str, candidate_id: CandidateId) -> Result<Candidate> {
        self.lock()?.cast_vote(raw_identifier, candidate_id)
    }

    pub fn results(&self) -> Result<ResultsReport> {
        Ok(self.lock()?.results())
    }

    pub fn voter_status(&self) -> Result<Vec<VoterStatus>> {
        Ok(self.lock()?.voter_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_clones_share_state() {
        let election = SharedElection::default();
        let other = election.clone();

        election.add_candidate("Alice").unwrap();
        other.register_voter("Sam", "fp1").unwrap();
        other.start_election().unwrap();

        assert!(election.with_session(|s| s.is_active()).unwrap());
        election.cast_vote("fp1", 1).unwrap();
        assert_eq!(other.results().unwrap().total_votes, 1);
        assert!(matches!(
            other.authenticate_voter("fp1"),
            Err(Error::AlreadyVoted { .. })
        ));
    }

    #[test]
    fn test_stop_and_status() {
        let election = SharedElection::default();
        election.add_candidate("Alice").unwrap();
        election.register_voter("Sam", "fp1").unwrap();
        election.start_election().unwrap();
        election.stop_election().unwrap();

        assert!(!election.with_session(|s| s.is_active()).unwrap());
        let status = election.voter_status().unwrap();
        assert_eq!(status.len(), 1);
        assert!(!status[0].has_voted);
    }
}
