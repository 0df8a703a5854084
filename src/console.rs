//! Text menu front end for the voting machine
//!
//! Reads choices from any `BufRead`, drives an [`ElectionSession`] and
//! writes the outcome of each operation to any `Write`. End of input is
//! treated as Exit.

use crate::config::ConsoleConfig;
use crate::crypto::IdentityHasher;
use crate::election::ElectionSession;
use crate::{Error, Result};
use std::io::{BufRead, Write};
use zeroize::Zeroizing;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Menu entries, numbered from 1
const MENU: [&str; 8] = [
    "Add Candidate",
    "Register Voter",
    "Start Election",
    "Cast Vote",
    "Stop Election",
    "Display Election Results",
    "Display Voter Status",
    "Exit",
];

/// Interactive console bound to an input and an output stream
pub struct Console<R, W> {
    input: R,
    output: W,
    clear_screen: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, config: &ConsoleConfig) -> Self {
        Self {
            input,
            output,
            clear_screen: config.clear_screen,
        }
    }

    /// Run the menu loop until Exit or end of input
    pub fn run<H: IdentityHasher>(&mut self, session: &mut ElectionSession<H>) -> Result<()> {
        tracing::info!("🖥️  Console attached to session {}", session.session_id());

        self.clear()?;
        loop {
            self.print_menu()?;

            let Some(line) = self.prompt("Enter your choice: ")? else {
                break;
            };
            let Ok(choice) = line.trim().parse::<usize>() else {
                continue;
            };

            self.clear()?;
            match choice {
                1 => self.add_candidate(session)?,
                2 => self.register_voter(session)?,
                3 => self.start_election(session)?,
                4 => self.cast_vote(session)?,
                5 => self.stop_election(session)?,
                6 => self.display_results(session)?,
                7 => self.display_voter_status(session)?,
                8 => break,
                _ => continue,
            }
        }

        tracing::info!("Console detached from session {}", session.session_id());
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\n===== Simulated Fingerprint Voting System =====")?;
        for (number, entry) in MENU.iter().enumerate() {
            writeln!(self.output, "{}. {}", number + 1, entry)?;
        }
        Ok(())
    }

    fn add_candidate<H: IdentityHasher>(&mut self, session: &mut ElectionSession<H>) -> Result<()> {
        let Some(name) = self.prompt("Enter candidate name: ")? else {
            return Ok(());
        };

        match session.add_candidate(&name) {
            Ok(candidate) => writeln!(
                self.output,
                "Candidate '{}' added successfully with ID {}.",
                candidate.name, candidate.id
            )?,
            Err(Error::ElectionActive) => writeln!(
                self.output,
                "Cannot add candidates while the election is active."
            )?,
            Err(err) => self.report(err)?,
        }
        Ok(())
    }

    fn register_voter<H: IdentityHasher>(&mut self, session: &mut ElectionSession<H>) -> Result<()> {
        let Some(name) = self.prompt("Enter voter's full name: ")? else {
            return Ok(());
        };
        let Some(fingerprint) = self.prompt("Enter Fingerprint ID: ")? else {
            return Ok(());
        };
        let fingerprint = Zeroizing::new(fingerprint);

        match session.register_voter(&name, &fingerprint) {
            Ok(voter) => writeln!(
                self.output,
                "Voter '{}' registered successfully (Reg ID: {}).",
                voter.name, voter.registration_id
            )?,
            Err(Error::ElectionActive) => writeln!(
                self.output,
                "Cannot register new voters while the election is active."
            )?,
            Err(err) => self.report(err)?,
        }
        Ok(())
    }

    fn start_election<H: IdentityHasher>(&mut self, session: &mut ElectionSession<H>) -> Result<()> {
        match session.start_election() {
            Ok(()) => writeln!(self.output, "\n--- Election Started ---")?,
            Err(err) => writeln!(self.output, "Cannot start election: {err}.")?,
        }
        Ok(())
    }

    fn stop_election<H: IdentityHasher>(&mut self, session: &mut ElectionSession<H>) -> Result<()> {
        session.stop_election();
        writeln!(self.output, "\n--- Election Stopped ---")?;
        Ok(())
    }

    fn cast_vote<H: IdentityHasher>(&mut self, session: &mut ElectionSession<H>) -> Result<()> {
        if !session.is_active() {
            writeln!(self.output, "Voting is currently closed.")?;
            return Ok(());
        }
        if session.candidate_count() == 0 {
            writeln!(self.output, "No candidates are available to vote for.")?;
            return Ok(());
        }

        writeln!(self.output, "\n--- Cast Your Vote ---")?;
        let Some(fingerprint) = self.prompt("Please enter your unique Fingerprint ID: ")? else {
            return Ok(());
        };
        let fingerprint = Zeroizing::new(fingerprint);

        match session.authenticate_voter(&fingerprint) {
            Ok(voter) => writeln!(
                self.output,
                "Authentication Successful: Welcome {} (ID: {}).",
                voter.name, voter.registration_id
            )?,
            Err(err) => {
                writeln!(self.output, "Authentication Failed: {err}.")?;
                return Ok(());
            }
        }

        writeln!(self.output, "\nPlease choose a candidate:")?;
        let ballot_size = session.candidate_count();
        for (position, candidate) in session.ballot().iter().enumerate() {
            writeln!(self.output, "{}. {}", position + 1, candidate.name)?;
        }

        let candidate_id = loop {
            let question = format!("Enter the number (1-{ballot_size}) of your chosen candidate: ");
            let Some(selection) = self.prompt(&question)? else {
                writeln!(self.output, "\nVote cancelled.")?;
                return Ok(());
            };

            match session.candidate_for_selection(&selection) {
                Ok(id) => break id,
                Err(_) if selection.trim().parse::<i64>().is_err() => {
                    writeln!(self.output, "Invalid input. Please enter a number.")?;
                }
                Err(_) => writeln!(self.output, "Invalid choice number. Please try again.")?,
            }
        };

        match session.cast_vote(&fingerprint, candidate_id) {
            Ok(candidate) => {
                writeln!(self.output, "\nVote successfully cast for: {}", candidate.name)?
            }
            Err(err) => self.report(err)?,
        }
        Ok(())
    }

    fn display_results<H: IdentityHasher>(&mut self, session: &ElectionSession<H>) -> Result<()> {
        let report = session.results();

        writeln!(self.output, "\n--- Election Results ---")?;
        writeln!(self.output, "Total Votes Cast: {}\n", report.total_votes)?;
        for standing in &report.standings {
            writeln!(
                self.output,
                "- {}: {} votes ({:.1}%)",
                standing.name,
                standing.votes,
                report.percentage(standing)
            )?;
        }
        Ok(())
    }

    fn display_voter_status<H: IdentityHasher>(&mut self, session: &ElectionSession<H>) -> Result<()> {
        writeln!(self.output, "\n--- Registered Voter Status ---")?;
        for status in session.voter_status() {
            writeln!(self.output, "- {status}")?;
        }
        Ok(())
    }

    /// Print a recoverable failure; anything else ends the loop
    fn report(&mut self, err: Error) -> Result<()> {
        if !err.is_recoverable() {
            return Err(err);
        }
        writeln!(self.output, "Error: {err}.")?;
        Ok(())
    }

    /// Print `question` and read one line without its line ending
    fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn clear(&mut self) -> Result<()> {
        if self.clear_screen {
            write!(self.output, "{CLEAR_SCREEN}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(script: &str, session: &mut ElectionSession) -> String {
        let mut output = Vec::new();
        let config = ConsoleConfig {
            clear_screen: false,
        };
        Console::new(script.as_bytes(), &mut output, &config)
            .run(session)
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_menu_ignores_garbage() {
        let mut session = ElectionSession::default();
        let out = run_script("abc\n42\n8\n", &mut session);
        assert_eq!(out.matches("===== Simulated Fingerprint Voting System =====").count(), 3);
        assert!(out.contains("8. Exit"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let mut session = ElectionSession::default();
        let out = run_script("1\nAlice\n", &mut session);
        assert!(out.contains("Candidate 'Alice' added successfully with ID 1."));
        assert_eq!(session.candidate_count(), 1);
    }

    #[test]
    fn test_registration_messages() {
        let mut session = ElectionSession::default();
        let out = run_script("2\nSam\nfp1\n2\nTina\nfp1\n2\nUma\n\n8\n", &mut session);
        assert!(out.contains("Voter 'Sam' registered successfully (Reg ID: 1)."));
        assert!(out.contains("Error: This fingerprint is already registered to Sam."));
        assert!(out.contains("Error: Fingerprint ID cannot be empty."));
        assert_eq!(session.voter_count(), 1);
    }

    #[test]
    fn test_vote_closed_message() {
        let mut session = ElectionSession::default();
        let out = run_script("4\n8\n", &mut session);
        assert!(out.contains("Voting is currently closed."));
    }

    #[test]
    fn test_clearing_screen_consumes_no_input() {
        let mut session = ElectionSession::default();
        let mut output = Vec::new();
        let config = ConsoleConfig { clear_screen: true };
        Console::new("1\nAlice\n1\nBob\n8\n".as_bytes(), &mut output, &config)
            .run(&mut session)
            .unwrap();

        assert_eq!(session.candidate_count(), 2);
        let out = String::from_utf8(output).unwrap();
        assert!(out.contains(CLEAR_SCREEN));
        assert!(out.contains("Candidate 'Bob' added successfully with ID 2."));
    }

    #[test]
    fn test_prompt_strips_line_endings() {
        let mut output = Vec::new();
        let config = ConsoleConfig { clear_screen: true };
        let mut console = Console::new("fp 1\r\n".as_bytes(), &mut output, &config);
        assert_eq!(console.prompt("? ").unwrap().as_deref(), Some("fp 1"));
        assert_eq!(console.prompt("? ").unwrap(), None);
    }
}
