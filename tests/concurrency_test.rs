//! Concurrent access to a shared election session

use fpvote::{Error, Result, SharedElection};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

fn ready_election(voters: usize) -> Result<SharedElection> {
    let election = SharedElection::default();
    election.add_candidate("Alice")?;
    election.add_candidate("Bob")?;
    for i in 0..voters {
        election.register_voter(&format!("Voter {i}"), &format!("fp{i}"))?;
    }
    election.start_election()?;
    Ok(election)
}

#[test]
fn test_same_voter_racing_threads_vote_once() -> Result<()> {
    let election = ready_election(1)?;
    let successes = Arc::new(AtomicUsize::new(0));
    let already_voted = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let election = election.clone();
            let successes = successes.clone();
            let already_voted = already_voted.clone();
            thread::spawn(move || match election.cast_vote("fp0", i % 2 + 1) {
                Ok(_) => {
                    successes.fetch_add(1, Ordering::SeqCst);
                }
                Err(Error::AlreadyVoted { .. }) => {
                    already_voted.fetch_add(1, Ordering::SeqCst);
                }
                Err(e) => panic!("unexpected failure: {e}"),
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("voting thread panicked");
    }

    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(already_voted.load(Ordering::SeqCst), 15);
    assert_eq!(election.results()?.total_votes, 1);
    Ok(())
}

#[tokio::test]
async fn test_many_voters_concurrently() -> Result<()> {
    let voters = 50;
    let election = ready_election(voters)?;

    let mut handles = Vec::new();
    for i in 0..voters {
        let election = election.clone();
        handles.push(tokio::spawn(async move {
            let fingerprint = format!("fp{i}");
            // authenticate first, then cast, like the console does
            election
                .authenticate_voter(&fingerprint)
                .and_then(|_| election.cast_vote(&fingerprint, (i % 2 + 1) as u32))
        }));
    }

    for handle in handles {
        handle.await.expect("voting task panicked")?;
    }

    let report = election.results()?;
    assert_eq!(report.total_votes, voters as u64);
    let voted = election.with_session(|s| s.voters_who_voted())?;
    assert_eq!(voted, voters);
    Ok(())
}

#[tokio::test]
async fn test_stop_during_voting_keeps_tally_consistent() -> Result<()> {
    let voters = 40;
    let election = ready_election(voters)?;

    let mut handles = Vec::new();
    for i in 0..voters {
        let election = election.clone();
        handles.push(tokio::spawn(async move {
            election.cast_vote(&format!("fp{i}"), 1)
        }));
    }
    election.stop_election()?;

    for handle in handles {
        match handle.await.expect("voting task panicked") {
            Ok(_) | Err(Error::ElectionInactive) => {}
            Err(e) => panic!("unexpected failure: {e}"),
        }
    }

    let (votes, voted) = election.with_session(|s| (s.votes_cast(), s.voters_who_voted()))?;
    assert_eq!(votes, voted as u64);
    Ok(())
}
