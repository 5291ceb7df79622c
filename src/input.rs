//! Keyboard and mouse input
//!
//! Key bindings:
//! - Space: start / stop / resume the selected watch
//! - `r`: reset, `l`: lap
//! - `1`-`9`: select a watch, Tab / Shift-Tab: cycle selection
//! - `v`: listen for a voice command
//! - `q`, Esc, Ctrl+C: quit

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, warn};

use crate::board::WatchCommand;
use crate::events::{AppEvent, EventSender, WatchId};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Watch(WatchCommand),
    Select(WatchId),
    SelectNext,
    SelectPrev,
    /// Re-activate the voice recognizer
    Listen,
    Quit,
}

/// Map a key press to an action. Releases and repeats are ignored.
pub fn action_for_key(key: &KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char(' ') => Some(Action::Watch(WatchCommand::Toggle)),
        KeyCode::Char('r') => Some(Action::Watch(WatchCommand::Reset)),
        KeyCode::Char('l') => Some(Action::Watch(WatchCommand::Lap)),
        KeyCode::Char('v') => Some(Action::Listen),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| Action::Select(d as WatchId)),
        KeyCode::Tab => Some(Action::SelectNext),
        KeyCode::BackTab => Some(Action::SelectPrev),
        _ => None,
    }
}

/// Terminal event reader running on its own thread.
///
/// Dropping the listener stops the thread and waits for it to exit.
pub struct KeyboardListener {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl KeyboardListener {
    pub fn attach(tx: EventSender) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = Arc::clone(&running);

        let thread = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match event::poll(POLL_INTERVAL) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(e) => {
                        warn!("input poll failed: {}", e);
                        break;
                    }
                }
                let forwarded = match event::read() {
                    Ok(Event::Key(key)) => AppEvent::Key(key),
                    Ok(Event::Mouse(mouse)) => AppEvent::Mouse(mouse),
                    Ok(Event::Resize(cols, rows)) => AppEvent::Resize(cols, rows),
                    Ok(_) => continue,
                    Err(e) => {
                        warn!("input read failed: {}", e);
                        break;
                    }
                };
                if tx.send(forwarded).is_err() {
                    break;
                }
            }
            debug!("keyboard listener stopped");
        });

        Self {
            running,
            thread: Some(thread),
        }
    }
}

impl Drop for KeyboardListener {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
