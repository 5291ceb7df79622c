//! Stopwatch instances and keyboard routing between them
//!
//! A [`Watch`] owns one engine, its announcement trigger and its sampling
//! handle. The [`Board`] holds every watch plus the current selection and
//! routes commands to the selected one.

use std::time::Duration;

use tracing::{debug, info};

use crate::announce::{Announcement, AnnouncementTrigger};
use crate::clock::Clock;
use crate::engine::{Sampling, StopwatchEngine};
use crate::events::WatchId;
use crate::sampler::SamplingService;

/// Commands that act on the selected watch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchCommand {
    /// Start, stop or resume depending on state
    Toggle,
    Reset,
    Lap,
    /// Voice-triggered start; ignored while running
    Start,
}

pub struct Watch<H, C: Clock> {
    id: WatchId,
    engine: StopwatchEngine<C>,
    trigger: AnnouncementTrigger,
    ticker: Option<H>,
}

impl<H, C: Clock> Watch<H, C> {
    pub fn new(id: WatchId, clock: C, rate: f32) -> Self {
        Self {
            id,
            engine: StopwatchEngine::new(clock),
            trigger: AnnouncementTrigger::new(rate),
            ticker: None,
        }
    }

    pub fn id(&self) -> WatchId {
        self.id
    }

    pub fn engine(&self) -> &StopwatchEngine<C> {
        &self.engine
    }

    pub fn is_sampling(&self) -> bool {
        self.ticker.is_some()
    }

    fn apply<S>(&mut self, sampling: Option<Sampling>, sampler: &S, every: Duration)
    where
        S: SamplingService<Handle = H>,
    {
        match sampling {
            Some(Sampling::Begin) => {
                // Drop any live handle before arming a new one
                self.ticker = None;
                self.ticker = Some(sampler.arm(self.id, every));
            }
            Some(Sampling::Cancel) => self.ticker = None,
            None => {}
        }
    }

    fn run<S>(&mut self, command: WatchCommand, sampler: &S, every: Duration) -> Option<Announcement>
    where
        S: SamplingService<Handle = H>,
    {
        match command {
            WatchCommand::Toggle => {
                let sampling = self.engine.toggle();
                self.apply(sampling, sampler, every);
            }
            WatchCommand::Start => {
                let sampling = self.engine.start();
                self.apply(sampling, sampler, every);
            }
            WatchCommand::Reset => self.engine.reset(),
            WatchCommand::Lap => {
                let lap = self.engine.record_lap().parts();
                debug!(watch = self.id, lap = %lap.lap(), "lap recorded");
            }
        }
        self.observe()
    }

    /// Sampling tick. Ticks that arrive after stop are ignored by the engine.
    pub fn tick(&mut self) -> Option<Announcement> {
        self.engine.sample();
        self.observe()
    }

    fn observe(&mut self) -> Option<Announcement> {
        self.trigger.observe(self.engine.parts().minutes)
    }
}

pub struct Board<S: SamplingService, C: Clock> {
    sampler: S,
    watches: Vec<Watch<S::Handle, C>>,
    selected: WatchId,
    laps_enabled: bool,
    interval: Duration,
}

impl<S, C> Board<S, C>
where
    S: SamplingService,
    C: Clock + Clone,
{
    /// Build `count` watches (at least one) sharing a clock source
    pub fn new(
        sampler: S,
        clock: C,
        count: usize,
        interval: Duration,
        laps_enabled: bool,
        rate: f32,
    ) -> Self {
        let watches = (1..=count.max(1))
            .map(|id| Watch::new(id, clock.clone(), rate))
            .collect();
        Self {
            sampler,
            watches,
            selected: 1,
            laps_enabled,
            interval,
        }
    }

    pub fn watches(&self) -> &[Watch<S::Handle, C>] {
        &self.watches
    }

    pub fn watch(&self, id: WatchId) -> Option<&Watch<S::Handle, C>> {
        id.checked_sub(1).and_then(|i| self.watches.get(i))
    }

    pub fn selected(&self) -> WatchId {
        self.selected
    }

    pub fn is_multi(&self) -> bool {
        self.watches.len() > 1
    }

    pub fn laps_enabled(&self) -> bool {
        self.laps_enabled
    }

    pub fn select(&mut self, id: WatchId) {
        if self.watch(id).is_some() && id != self.selected {
            debug!(watch = id, "selected");
            self.selected = id;
        }
    }

    pub fn select_next(&mut self) {
        let next = self.selected % self.watches.len() + 1;
        self.select(next);
    }

    pub fn select_prev(&mut self) {
        let prev = if self.selected == 1 {
            self.watches.len()
        } else {
            self.selected - 1
        };
        self.select(prev);
    }

    /// Run a command on the selected watch, returning anything to speak
    pub fn dispatch(&mut self, command: WatchCommand) -> Option<Announcement> {
        if command == WatchCommand::Lap && !self.laps_enabled {
            return None;
        }
        let id = self.selected;
        let index = id - 1;
        info!(watch = id, ?command, "command");
        let announcement = self.watches[index].run(command, &self.sampler, self.interval);
        self.gate(id, announcement)
    }

    /// Sample one watch in response to its tick
    pub fn tick(&mut self, id: WatchId) -> Option<Announcement> {
        let index = id.checked_sub(1).filter(|i| *i < self.watches.len())?;
        let announcement = self.watches[index].tick();
        self.gate(id, announcement)
    }

    /// With several watches only the selected one speaks
    fn gate(&self, id: WatchId, announcement: Option<Announcement>) -> Option<Announcement> {
        announcement.filter(|_| !self.is_multi() || id == self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Counts live handles so tests can see arming and cancelling
    #[derive(Clone, Default)]
    struct FakeSampler {
        live: Rc<RefCell<Vec<WatchId>>>,
        armed: Rc<RefCell<usize>>,
    }

    struct FakeHandle {
        watch: WatchId,
        live: Rc<RefCell<Vec<WatchId>>>,
    }

    impl Drop for FakeHandle {
        fn drop(&mut self) {
            let mut live = self.live.borrow_mut();
            if let Some(pos) = live.iter().position(|w| *w == self.watch) {
                live.remove(pos);
            }
        }
    }

    impl SamplingService for FakeSampler {
        type Handle = FakeHandle;

        fn arm(&self, watch: WatchId, _every: Duration) -> FakeHandle {
            self.live.borrow_mut().push(watch);
            *self.armed.borrow_mut() += 1;
            FakeHandle {
                watch,
                live: Rc::clone(&self.live),
            }
        }
    }

    fn board(count: usize) -> (ManualClock, FakeSampler, Board<FakeSampler, ManualClock>) {
        let clock = ManualClock::new();
        let sampler = FakeSampler::default();
        let board = Board::new(
            sampler.clone(),
            clock.clone(),
            count,
            Duration::from_millis(50),
            true,
            1.5,
        );
        (clock, sampler, board)
    }

    #[test]
    fn test_toggle_arms_and_cancels() {
        let (_, sampler, mut board) = board(1);
        board.dispatch(WatchCommand::Toggle);
        assert_eq!(*sampler.live.borrow(), vec![1]);
        assert!(board.watch(1).unwrap().is_sampling());

        board.dispatch(WatchCommand::Toggle);
        assert!(sampler.live.borrow().is_empty());
        assert!(!board.watch(1).unwrap().is_sampling());
    }

    #[test]
    fn test_repeated_start_never_double_arms() {
        let (_, sampler, mut board) = board(1);
        board.dispatch(WatchCommand::Start);
        board.dispatch(WatchCommand::Start);
        board.dispatch(WatchCommand::Start);
        assert_eq!(*sampler.armed.borrow(), 1);
        assert_eq!(sampler.live.borrow().len(), 1);
    }

    #[test]
    fn test_drop_cancels_sampling() {
        let (_, sampler, mut board) = board(2);
        board.dispatch(WatchCommand::Toggle);
        board.select(2);
        board.dispatch(WatchCommand::Toggle);
        assert_eq!(sampler.live.borrow().len(), 2);
        drop(board);
        assert!(sampler.live.borrow().is_empty());
    }

    #[test]
    fn test_commands_route_to_selected() {
        let (clock, _, mut board) = board(4);
        board.select(3);
        board.dispatch(WatchCommand::Toggle);
        clock.advance(2_000);
        board.tick(3);
        assert_eq!(board.watch(3).unwrap().engine().elapsed_ms(), 2_000);
        assert!(!board.watch(1).unwrap().engine().is_running());
    }

    #[test]
    fn test_select_out_of_range_ignored() {
        let (_, _, mut board) = board(4);
        board.select(0);
        board.select(5);
        assert_eq!(board.selected(), 1);
    }

    #[test]
    fn test_select_cycles() {
        let (_, _, mut board) = board(3);
        board.select_prev();
        assert_eq!(board.selected(), 3);
        board.select_next();
        assert_eq!(board.selected(), 1);
        board.select_next();
        assert_eq!(board.selected(), 2);
    }

    #[test]
    fn test_lap_disabled() {
        let clock = ManualClock::new();
        let mut board = Board::new(
            FakeSampler::default(),
            clock,
            1,
            Duration::from_millis(100),
            false,
            1.5,
        );
        board.dispatch(WatchCommand::Lap);
        assert!(board.watch(1).unwrap().engine().laps().is_empty());
    }

    #[test]
    fn test_single_watch_announces() {
        let (clock, _, mut board) = board(1);
        board.dispatch(WatchCommand::Toggle);
        clock.advance(60_000);
        let announcement = board.tick(1);
        assert_eq!(announcement.map(|a| a.text), Some("1 minute!".into()));
        assert!(board.tick(1).is_none());
    }

    #[test]
    fn test_only_selected_watch_announces() {
        let (clock, _, mut board) = board(2);
        board.dispatch(WatchCommand::Toggle);
        board.select(2);
        board.dispatch(WatchCommand::Toggle);
        clock.advance(60_000);
        assert!(board.tick(1).is_none());
        assert!(board.tick(2).is_some());
        // Watch 1 already saw minute 1 while unselected
        board.select(1);
        assert!(board.tick(1).is_none());
    }

    #[test]
    fn test_tick_for_unknown_watch() {
        let (_, _, mut board) = board(1);
        assert!(board.tick(0).is_none());
        assert!(board.tick(7).is_none());
    }
}
