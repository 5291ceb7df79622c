use crossterm::event::{KeyEvent, MouseEvent};

/// 1-based stopwatch id, as shown in the panel header
pub type WatchId = usize;

/// Everything the main loop reacts to, delivered one at a time
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic sampling tick for one watch
    Sample(WatchId),
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// New terminal size in columns and rows
    Resize(u16, u16),
    /// Transcript from the voice recognizer
    Voice(String),
}

pub type EventSender = flume::Sender<AppEvent>;
pub type EventReceiver = flume::Receiver<AppEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    flume::unbounded()
}
