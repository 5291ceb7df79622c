//! Event handling: routes ticks, keys, clicks and voice transcripts
//!
//! Every event is handled to completion before the next one, on the thread
//! that drives the loop.

use crossterm::event::{MouseButton, MouseEventKind};
use tracing::{debug, info};

use crate::announce::Announcement;
use crate::board::{Board, WatchCommand};
use crate::clock::Clock;
use crate::events::{AppEvent, EventSender};
use crate::input::{self, Action};
use crate::render;
use crate::sampler::SamplingService;
use crate::speech::SpeechSink;
use crate::voice::{Recognizer, VoiceCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<S: SamplingService, C: Clock, K> {
    board: Board<S, C>,
    speech: K,
    events: EventSender,
    /// Recognizer argv, empty when voice commands are off
    voice_command: Vec<String>,
    recognizer: Option<Recognizer>,
    width: u16,
}

impl<S, C, K> App<S, C, K>
where
    S: SamplingService,
    C: Clock + Clone,
    K: SpeechSink,
{
    pub fn new(board: Board<S, C>, speech: K, events: EventSender, width: u16) -> Self {
        Self {
            board,
            speech,
            events,
            voice_command: Vec::new(),
            recognizer: None,
            width,
        }
    }

    /// Enable voice commands through the given recognizer argv
    pub fn with_voice(mut self, command: Vec<String>) -> Self {
        self.voice_command = command;
        self
    }

    pub fn board(&self) -> &Board<S, C> {
        &self.board
    }

    pub fn is_listening(&self) -> bool {
        self.recognizer.is_some()
    }

    /// Start one round of voice recognition, replacing any running one
    pub fn listen(&mut self) {
        if self.voice_command.is_empty() {
            debug!("voice commands disabled");
            return;
        }
        self.recognizer = None;
        self.recognizer = Recognizer::activate(&self.voice_command, self.events.clone());
    }

    pub fn handle(&mut self, event: AppEvent) -> Flow {
        match event {
            AppEvent::Sample(id) => {
                let announcement = self.board.tick(id);
                self.announce(announcement);
            }
            AppEvent::Key(key) => {
                if let Some(action) = input::action_for_key(&key) {
                    return self.act(action);
                }
            }
            AppEvent::Mouse(mouse) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    let count = self.board.watches().len();
                    if let Some(id) = render::panel_at(mouse.column, self.width, count) {
                        self.board.select(id);
                    }
                }
            }
            AppEvent::Resize(cols, _) => self.width = cols,
            AppEvent::Voice(transcript) => {
                // One transcript per activation
                self.recognizer = None;
                match VoiceCommand::parse(&transcript) {
                    Some(VoiceCommand::Go) => {
                        info!("voice command: go");
                        let announcement = self.board.dispatch(WatchCommand::Start);
                        self.announce(announcement);
                    }
                    Some(VoiceCommand::Stop) => debug!("voice command: stop (ignored)"),
                    None => debug!(transcript = %transcript, "not a voice command"),
                }
            }
        }
        Flow::Continue
    }

    fn act(&mut self, action: Action) -> Flow {
        match action {
            Action::Watch(command) => {
                let announcement = self.board.dispatch(command);
                self.announce(announcement);
            }
            Action::Select(id) => self.board.select(id),
            Action::SelectNext => self.board.select_next(),
            Action::SelectPrev => self.board.select_prev(),
            Action::Listen => self.listen(),
            Action::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn announce(&mut self, announcement: Option<Announcement>) {
        if let Some(announcement) = announcement {
            info!(text = %announcement.text, "announce");
            self.speech.speak(&announcement.text, announcement.rate);
        }
    }
}
