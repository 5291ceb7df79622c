//! End-to-end stopwatch behaviour: engine timing, key routing, announcements

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use lapwatch::app::{App, Flow};
use lapwatch::board::Board;
use lapwatch::clock::ManualClock;
use lapwatch::config::Resolution;
use lapwatch::engine::StopwatchEngine;
use lapwatch::events::{self, AppEvent, WatchId};
use lapwatch::format;
use lapwatch::render;
use lapwatch::sampler::SamplingService;
use lapwatch::speech::SpeechSink;

/// Sampler that hands out inert handles and counts live ones
#[derive(Clone, Default)]
struct CountingSampler {
    live: Rc<RefCell<usize>>,
}

struct CountingHandle(Rc<RefCell<usize>>);

impl Drop for CountingHandle {
    fn drop(&mut self) {
        *self.0.borrow_mut() -= 1;
    }
}

impl SamplingService for CountingSampler {
    type Handle = CountingHandle;

    fn arm(&self, _watch: WatchId, _every: Duration) -> CountingHandle {
        *self.live.borrow_mut() += 1;
        CountingHandle(Rc::clone(&self.live))
    }
}

#[derive(Clone, Default)]
struct RecordingSpeech {
    spoken: Rc<RefCell<Vec<(String, f32)>>>,
}

impl SpeechSink for RecordingSpeech {
    fn speak(&mut self, text: &str, rate: f32) {
        self.spoken.borrow_mut().push((text.to_string(), rate));
    }
}

struct Harness {
    clock: ManualClock,
    sampler: CountingSampler,
    speech: RecordingSpeech,
    app: App<CountingSampler, ManualClock, RecordingSpeech>,
}

fn harness(instances: usize) -> Harness {
    let clock = ManualClock::new();
    let sampler = CountingSampler::default();
    let speech = RecordingSpeech::default();
    let board = Board::new(
        sampler.clone(),
        clock.clone(),
        instances,
        Resolution::Fine.interval(),
        true,
        1.5,
    );
    let (tx, _rx) = events::channel();
    let app = App::new(board, speech.clone(), tx, 80);
    Harness {
        clock,
        sampler,
        speech,
        app,
    }
}

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn click(column: u16) -> AppEvent {
    AppEvent::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row: 3,
        modifiers: KeyModifiers::NONE,
    })
}

fn elapsed(h: &Harness, id: WatchId) -> u64 {
    h.app.board().watch(id).unwrap().engine().elapsed_ms()
}

#[test]
fn start_wait_sample_tracks_clock() {
    let clock = ManualClock::new();
    let mut sw = StopwatchEngine::new(clock.clone());
    sw.start();
    sw.sample();
    assert_eq!(sw.elapsed_ms(), 0);
    clock.advance(1_234);
    sw.sample();
    assert_eq!(sw.elapsed_ms(), 1_234);
}

#[test]
fn stopped_watch_ignores_samples() {
    let clock = ManualClock::new();
    let mut sw = StopwatchEngine::new(clock.clone());
    sw.start();
    clock.advance(800);
    sw.sample();
    sw.stop();
    clock.advance(10_000);
    sw.sample();
    assert_eq!(sw.elapsed_ms(), 800);
}

#[test]
fn resume_accumulates_across_segments() {
    let clock = ManualClock::new();
    let mut sw = StopwatchEngine::new(clock.clone());
    sw.start();
    clock.advance(1_000);
    sw.sample();
    sw.stop();
    clock.advance(7_000);
    sw.start();
    clock.advance(2_500);
    sw.sample();
    assert_eq!(sw.elapsed_ms(), 3_500);
}

#[test]
fn laps_match_format_at_call_time() {
    let clock = ManualClock::new();
    let mut sw = StopwatchEngine::new(clock.clone());
    sw.start();
    let mut expected = Vec::new();
    for step in [450, 1_000, 61_000, 3_600_000] {
        clock.advance(step);
        sw.sample();
        expected.push(format::format(sw.elapsed_ms()));
        sw.record_lap();
    }
    let recorded: Vec<_> = sw.laps().iter().map(|l| l.parts()).collect();
    assert_eq!(recorded, expected);
}

#[test]
fn space_starts_stops_and_resumes() {
    let mut h = harness(1);
    h.app.handle(key(' '));
    assert_eq!(*h.sampler.live.borrow(), 1);

    h.clock.advance(1_500);
    h.app.handle(AppEvent::Sample(1));
    h.app.handle(key(' '));
    assert_eq!(*h.sampler.live.borrow(), 0);
    assert_eq!(elapsed(&h, 1), 1_500);

    h.app.handle(key(' '));
    h.clock.advance(500);
    h.app.handle(AppEvent::Sample(1));
    assert_eq!(elapsed(&h, 1), 2_000);
}

#[test]
fn reset_and_lap_keys() {
    let mut h = harness(1);
    h.app.handle(key(' '));
    h.clock.advance(12_300);
    h.app.handle(AppEvent::Sample(1));
    h.app.handle(key('l'));
    h.app.handle(key('r'));

    let watch = h.app.board().watch(1).unwrap();
    assert_eq!(watch.engine().elapsed_ms(), 0);
    assert!(watch.engine().is_running());
    assert_eq!(watch.engine().laps().len(), 1);

    let lines = render::panel_lines(watch, Resolution::Fine, true, 10);
    assert_eq!(lines[1], "LAP 0:00:12:3");
    assert_eq!(lines[2], "0:00:00.0");
    assert_eq!(lines[3], "[space] Stop  [r] Reset  [l] Lap");
    assert_eq!(lines[5], "LAPS");
    assert_eq!(lines[6], "1. 0:00:12");
}

#[test]
fn lap_list_keeps_recent_entries() {
    let mut h = harness(1);
    h.app.handle(key(' '));
    for _ in 0..5 {
        h.clock.advance(1_000);
        h.app.handle(AppEvent::Sample(1));
        h.app.handle(key('l'));
    }
    let watch = h.app.board().watch(1).unwrap();
    let lines = render::panel_lines(watch, Resolution::Coarse, true, 2);
    assert_eq!(&lines[lines.len() - 2..], ["4. 0:00:04", "5. 0:00:05"]);
}

#[test]
fn minutes_are_announced_once() {
    let mut h = harness(1);
    h.app.handle(key(' '));
    for _ in 0..(3 * 60 * 20) {
        h.clock.advance(50);
        h.app.handle(AppEvent::Sample(1));
    }
    let spoken = h.speech.spoken.borrow();
    let texts: Vec<&str> = spoken.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(texts, ["1 minute!", "2 minutes!", "3 minutes!"]);
    assert!(spoken.iter().all(|(_, rate)| *rate == 1.5));
}

#[test]
fn space_routes_to_clicked_watch() {
    let mut h = harness(4);
    // 80 columns, four panels of 20
    h.app.handle(click(45));
    assert_eq!(h.app.board().selected(), 3);

    h.app.handle(key(' '));
    h.clock.advance(900);
    h.app.handle(AppEvent::Sample(3));
    assert_eq!(elapsed(&h, 3), 900);
    assert!(!h.app.board().watch(1).unwrap().engine().is_running());
}

#[test]
fn resize_moves_click_targets() {
    let mut h = harness(2);
    h.app.handle(AppEvent::Resize(40, 20));
    h.app.handle(click(25));
    assert_eq!(h.app.board().selected(), 2);
}

#[test]
fn only_selected_watch_speaks() {
    let mut h = harness(2);
    h.app.handle(key(' '));
    h.app.handle(key('2'));
    h.app.handle(key(' '));
    h.clock.advance(60_000);
    h.app.handle(AppEvent::Sample(1));
    h.app.handle(AppEvent::Sample(2));
    let spoken = h.speech.spoken.borrow();
    assert_eq!(spoken.len(), 1);
}

#[test]
fn voice_go_starts_selected_watch() {
    let mut h = harness(1);
    h.app.handle(AppEvent::Voice("Go.".to_string()));
    assert!(h.app.board().watch(1).unwrap().engine().is_running());

    // "go" while running is a no-op, not a stop
    h.app.handle(AppEvent::Voice("go".to_string()));
    assert!(h.app.board().watch(1).unwrap().engine().is_running());
    assert_eq!(*h.sampler.live.borrow(), 1);
}

#[test]
fn other_voice_transcripts_ignored() {
    let mut h = harness(1);
    h.app.handle(AppEvent::Voice("stop".to_string()));
    h.app.handle(AppEvent::Voice("going".to_string()));
    assert!(!h.app.board().watch(1).unwrap().engine().is_running());
}

#[test]
fn listen_without_recognizer_is_noop() {
    let mut h = harness(1);
    h.app.handle(key('v'));
    assert!(!h.app.is_listening());
}

#[test]
fn quit_key_ends_loop_and_teardown_cancels_sampling() {
    let mut h = harness(3);
    h.app.handle(key(' '));
    h.app.handle(key('3'));
    h.app.handle(key(' '));
    assert_eq!(*h.sampler.live.borrow(), 2);
    assert_eq!(h.app.handle(key('q')), Flow::Quit);
    drop(h.app);
    assert_eq!(*h.sampler.live.borrow(), 0);
}
