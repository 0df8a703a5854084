//! The voting machine state machine
//!
//! An [`ElectionSession`] owns every candidate and voter and enforces the
//! rules of a single election:
//! 1. Candidates and voters are only added during `Setup`
//! 2. An election starts only with at least one candidate and one voter
//! 3. Votes are only accepted while `Active`
//! 4. Each fingerprint votes at most once, ever
//!
//! The machine may cycle `Setup -> Active -> Setup` any number of times.

pub mod shared;

use crate::crypto::{FingerprintHasher, IdentityHasher};
use crate::types::{
    Candidate, CandidateId, ElectionPhase, FingerprintKey, RegistrationId, ResultsReport,
    Standing, Voter, VoterStatus,
};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

pub use shared::SharedElection;

/// A fingerprint voting machine session
pub struct ElectionSession<H: IdentityHasher = FingerprintHasher> {
    session_id: Uuid,
    hasher: H,
    phase: ElectionPhase,
    round: u32,
    started_at: Option<DateTime<Utc>>,
    stopped_at: Option<DateTime<Utc>>,
    // id order is insertion order
    candidates: BTreeMap<CandidateId, Candidate>,
    // index + 1 == registration id
    voters: Vec<Voter>,
    fingerprints: HashMap<FingerprintKey, usize>,
    next_candidate_id: CandidateId,
    next_registration_id: RegistrationId,
}

impl Default for ElectionSession<FingerprintHasher> {
    fn default() -> Self {
        Self::new(FingerprintHasher::default())
    }
}

impl<H: IdentityHasher> ElectionSession<H> {
    /// Create an empty session in the `Setup` phase
    pub fn new(hasher: H) -> Self {
        let session_id = Uuid::new_v4();
        tracing::debug!("🗳️  Election session {} created", session_id);

        Self {
            session_id,
            hasher,
            phase: ElectionPhase::Setup,
            round: 0,
            started_at: None,
            stopped_at: None,
            candidates: BTreeMap::new(),
            voters: Vec::new(),
            fingerprints: HashMap::new(),
            next_candidate_id: 1,
            next_registration_id: 1,
        }
    }

    /// Add a candidate to the ballot
    ///
    /// Fails with [`Error::ElectionActive`] while voting is open and with
    /// [`Error::DuplicateCandidate`] if the name already exists in any case.
    pub fn add_candidate(&mut self, name: &str) -> Result<Candidate> {
        if self.is_active() {
            tracing::warn!("Rejected candidate '{}': election active", name);
            return Err(Error::ElectionActive);
        }

        if self.candidates.values().any(|c| c.has_name(name)) {
            tracing::warn!("Rejected candidate '{}': duplicate name", name);
            return Err(Error::DuplicateCandidate {
                name: name.to_string(),
            });
        }

        let candidate = Candidate::new(self.next_candidate_id, name);
        self.candidates.insert(candidate.id, candidate.clone());
        self.next_candidate_id += 1;

        tracing::info!(
            "➕ Candidate added: id={}, name={}, session={}",
            candidate.id,
            candidate.name,
            self.session_id
        );

        Ok(candidate)
    }

    /// Register a voter under the digest of their fingerprint
    ///
    /// Names may repeat; fingerprints may not. A rejected registration
    /// never consumes a registration id.
    pub fn register_voter(&mut self, name: &str, raw_identifier: &str) -> Result<Voter> {
        if self.is_active() {
            tracing::warn!("Rejected voter registration: election active");
            return Err(Error::ElectionActive);
        }

        if raw_identifier.trim().is_empty() {
            tracing::warn!("Rejected voter registration: empty fingerprint");
            return Err(Error::EmptyIdentifier);
        }

        let fingerprint = self.hasher.fingerprint(raw_identifier);
        if let Some(&index) = self.fingerprints.get(&fingerprint) {
            let owner = self.voters[index].name.clone();
            tracing::warn!(
                "Rejected voter registration: fingerprint={} already registered",
                fingerprint.short()
            );
            return Err(Error::DuplicateVoter { owner });
        }

        let voter = Voter::new(self.next_registration_id, name, fingerprint.clone());
        self.fingerprints.insert(fingerprint, self.voters.len());
        self.voters.push(voter.clone());
        self.next_registration_id += 1;

        tracing::info!(
            "🧾 Voter registered: reg_id={}, fingerprint={}, session={}",
            voter.registration_id,
            voter.fingerprint.short(),
            self.session_id
        );

        Ok(voter)
    }

    /// Open voting
    ///
    /// Requires at least one candidate and one voter. Starting an election
    /// that is already running is a no-op.
    pub fn start_election(&mut self) -> Result<()> {
        if self.candidates.is_empty() {
            tracing::warn!("Cannot start election: no candidates");
            return Err(Error::NoCandidates);
        }
        if self.voters.is_empty() {
            tracing::warn!("Cannot start election: no voters");
            return Err(Error::NoVoters);
        }

        if self.is_active() {
            tracing::debug!("Election round {} already active", self.round);
            return Ok(());
        }

        self.phase = ElectionPhase::Active;
        self.round += 1;
        self.started_at = Some(Utc::now());

        tracing::info!(
            "🟢 Election started: round={}, candidates={}, voters={}, session={}",
            self.round,
            self.candidates.len(),
            self.voters.len(),
            self.session_id
        );

        Ok(())
    }

    /// Close voting; always succeeds
    pub fn stop_election(&mut self) {
        if self.is_active() {
            self.stopped_at = Some(Utc::now());
        }
        self.phase = ElectionPhase::Setup;

        tracing::info!(
            "🔴 Election stopped: round={}, votes_cast={}, session={}",
            self.round,
            self.votes_cast(),
            self.session_id
        );
    }

    /// Identify the voter behind a fingerprint without changing anything
    ///
    /// Fails with [`Error::ElectionInactive`] outside an election,
    /// [`Error::UnrecognizedIdentifier`] for unknown fingerprints and
    /// [`Error::AlreadyVoted`] for voters who have already voted.
    pub fn authenticate_voter(&self, raw_identifier: &str) -> Result<&Voter> {
        self.authenticated_index(raw_identifier)
            .map(|index| &self.voters[index])
    }

    fn authenticated_index(&self, raw_identifier: &str) -> Result<usize> {
        if !self.is_active() {
            return Err(Error::ElectionInactive);
        }

        let fingerprint = self.hasher.fingerprint(raw_identifier);
        let Some(&index) = self.fingerprints.get(&fingerprint) else {
            tracing::warn!(
                "Authentication failed: fingerprint={} not recognized",
                fingerprint.short()
            );
            return Err(Error::UnrecognizedIdentifier);
        };

        let voter = &self.voters[index];
        if voter.has_voted {
            tracing::warn!(
                "Authentication failed: reg_id={} has already voted",
                voter.registration_id
            );
            return Err(Error::AlreadyVoted {
                name: voter.name.clone(),
                registration_id: voter.registration_id,
            });
        }

        tracing::debug!("Voter authenticated: reg_id={}", voter.registration_id);
        Ok(index)
    }

    /// Record one vote for `candidate_id` on behalf of the fingerprint owner
    ///
    /// Authentication failures are returned unchanged. An unknown candidate
    /// is [`Error::InvalidSelection`]. Both checks complete before any state
    /// changes, so the tally and the voter's flag move together or not at all.
    pub fn cast_vote(&mut self, raw_identifier: &str, candidate_id: CandidateId) -> Result<Candidate> {
        let index = self.authenticated_index(raw_identifier)?;

        let Some(candidate) = self.candidates.get_mut(&candidate_id) else {
            tracing::warn!("Vote rejected: unknown candidate id {}", candidate_id);
            return Err(Error::InvalidSelection {
                selection: candidate_id.to_string(),
            });
        };

        candidate.vote_count += 1;
        let voter = &mut self.voters[index];
        voter.mark_voted();

        tracing::info!(
            "✅ Vote cast: reg_id={}, candidate={}, round={}",
            voter.registration_id,
            candidate.id,
            self.round
        );

        Ok(candidate.clone())
    }

    /// Candidates in ballot order
    pub fn ballot(&self) -> Vec<&Candidate> {
        self.candidates.values().collect()
    }

    /// Translate a 1-based ballot position typed by a voter into a candidate id
    pub fn candidate_for_selection(&self, input: &str) -> Result<CandidateId> {
        let invalid = || Error::InvalidSelection {
            selection: input.trim().to_string(),
        };

        let position: usize = input.trim().parse().map_err(|_| invalid())?;
        position
            .checked_sub(1)
            .and_then(|index| self.candidates.values().nth(index))
            .map(|candidate| candidate.id)
            .ok_or_else(invalid)
    }

    /// Tally sorted by votes, most first; ties keep ballot order
    pub fn results(&self) -> ResultsReport {
        let mut standings: Vec<Standing> = self
            .candidates
            .values()
            .map(|c| Standing {
                candidate_id: c.id,
                name: c.name.clone(),
                votes: c.vote_count,
            })
            .collect();
        // stable sort keeps id order among ties
        standings.sort_by(|a, b| b.votes.cmp(&a.votes));

        tracing::debug!("Results requested: round={}", self.round);

        ResultsReport {
            total_votes: self.votes_cast(),
            standings,
        }
    }

    /// Participation of every voter in registration order
    pub fn voter_status(&self) -> Vec<VoterStatus> {
        self.voters
            .iter()
            .map(|v| VoterStatus {
                registration_id: v.registration_id,
                name: v.name.clone(),
                has_voted: v.has_voted,
            })
            .collect()
    }

    pub fn phase(&self) -> ElectionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == ElectionPhase::Active
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Number of times the election has been started
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn stopped_at(&self) -> Option<DateTime<Utc>> {
        self.stopped_at
    }

    pub fn candidate(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.get(&id)
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.values()
    }

    pub fn voters(&self) -> impl Iterator<Item = &Voter> {
        self.voters.iter()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    /// Sum of all candidates' votes
    pub fn votes_cast(&self) -> u64 {
        self.candidates.values().map(|c| c.vote_count).sum()
    }

    /// Number of voters whose vote has been recorded
    pub fn voters_who_voted(&self) -> usize {
        self.voters.iter().filter(|v| v.has_voted).count()
    }
}
