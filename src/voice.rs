//! Voice command recognition
//!
//! Recognition is delegated to an external command that prints transcripts on
//! stdout, one per line. Each activation takes the first transcript and then
//! ends the recognizer, so a single utterance triggers at most one command.

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::thread;

use tracing::{debug, info, warn};

use crate::events::{AppEvent, EventSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    /// Start the selected watch
    Go,
    /// Recognized but has no effect
    Stop,
}

impl VoiceCommand {
    /// Match a transcript against the command vocabulary, exact words only
    pub fn parse(transcript: &str) -> Option<Self> {
        match clean_for_matching(transcript).as_str() {
            "go" => Some(VoiceCommand::Go),
            "stop" => Some(VoiceCommand::Stop),
            _ => None,
        }
    }
}

/// Lowercase, strip everything but letters and spaces, collapse whitespace
pub fn clean_for_matching(text: &str) -> String {
    let letters: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect();
    letters.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A running recognizer process. Dropping it kills the process.
pub struct Recognizer {
    child: Child,
}

impl Recognizer {
    /// Spawn `argv` and forward its first transcript as [`AppEvent::Voice`].
    ///
    /// Returns `None` when no recognizer is configured or it fails to start.
    pub fn activate(argv: &[String], tx: EventSender) -> Option<Self> {
        let Some((program, args)) = argv.split_first() else {
            info!("No speech recognition support");
            return None;
        };

        let mut child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                warn!(program = %program, "speech recognizer failed to start: {}", e);
                return None;
            }
        };

        let stdout = child.stdout.take()?;
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                let Ok(line) = line else { break };
                let transcript = line.trim();
                if transcript.is_empty() {
                    continue;
                }
                debug!(transcript, "voice transcript");
                let _ = tx.send(AppEvent::Voice(transcript.to_string()));
                break;
            }
        });

        info!(program = %program, "listening for voice command");
        Some(Self { child })
    }
}

impl Drop for Recognizer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        debug!("speech recognizer stopped");
    }
}
