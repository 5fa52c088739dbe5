use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use rand::Rng;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, trace};

use crate::{
    card::ComputedCard,
    config::Settings,
    sequencer::{Direction, Presentation, Sequencer},
};

/// Progress updates per dwell.
const PROGRESS_STEPS: u32 = 100;

struct Shared {
    sequencer: Sequencer,
    /// Bumped whenever timers are armed or cancelled. A timer only touches state
    /// while its epoch is current.
    epoch: u64,
    focused_at: Instant,
    tx: watch::Sender<Presentation>,
}

impl Shared {
    fn publish(&self) {
        self.tx.send_replace(self.sequencer.presentation());
    }
}

/// The two timers running while auto-playing. Dropping them cancels both.
struct Timers {
    advance: JoinHandle<()>,
    progress: JoinHandle<()>,
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.advance.abort();
        self.progress.abort();
    }
}

/// Drives a [`Sequencer`] in time: a coarse timer advances the focus every dwell,
/// a fine one fills the progress ratio in between.
///
/// Arming timers spawns tokio tasks, so `play` and friends must run inside a
/// runtime. Once `pause` returns, or the player is dropped, no timer changes state
/// anymore.
pub struct Player {
    shared: Arc<Mutex<Shared>>,
    timers: Option<Timers>,
    dwell: Duration,
    rx: watch::Receiver<Presentation>,
}

impl Player {
    pub fn new(settings: &Settings) -> Self {
        let sequencer = Sequencer::new(settings.swipe_threshold());
        let (tx, rx) = watch::channel(sequencer.presentation());

        Self {
            shared: Arc::new(Mutex::new(Shared {
                sequencer,
                epoch: 0,
                focused_at: Instant::now(),
                tx,
            })),
            timers: None,
            dwell: settings.dwell(),
            rx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        lock(&self.shared)
    }

    /// Every change to what should be on screen shows up here.
    pub fn subscribe(&self) -> watch::Receiver<Presentation> {
        self.rx.clone()
    }

    pub fn presentation(&self) -> Presentation {
        self.lock().sequencer.presentation()
    }

    pub fn is_playing(&self) -> bool {
        self.lock().sequencer.is_playing()
    }

    /// Cards in display order.
    pub fn cards(&self) -> Vec<ComputedCard> {
        self.lock().sequencer.cards().to_vec()
    }

    pub fn load<R: Rng + ?Sized>(&mut self, cards: Vec<ComputedCard>, rng: &mut R) {
        let rearm = {
            let mut shared = self.lock();
            shared.sequencer.load(cards, rng);
            shared.focused_at = Instant::now();
            shared.epoch += 1;
            shared.publish();
            shared.sequencer.is_playing().then_some(shared.epoch)
        };

        match rearm {
            Some(epoch) => self.arm(epoch),
            None => self.timers = None,
        }
    }

    /// Recomputes cards in place. Doesn't touch focus, timers or progress.
    pub fn refresh(&mut self, f: impl FnMut(&ComputedCard) -> ComputedCard) {
        let mut shared = self.lock();
        shared.sequencer.refresh(f);
        shared.publish();
    }

    /// Starts auto-playing. Already playing is a no-op: the current dwell and its
    /// progress carry on.
    pub fn play(&mut self) {
        let epoch = {
            let mut shared = self.lock();
            if shared.sequencer.is_playing() {
                return;
            }
            if !shared.sequencer.play() {
                debug!("nothing to play");
                return;
            }
            shared.epoch += 1;
            shared.focused_at = Instant::now();
            shared.publish();
            shared.epoch
        };

        debug!("autoplay on");
        self.arm(epoch);
    }

    pub fn pause(&mut self) {
        {
            let mut shared = self.lock();
            shared.epoch += 1;
            shared.sequencer.pause();
            shared.publish();
        }
        self.timers = None;
        debug!("autoplay off");
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Taps on the focused card toggle auto-play.
    pub fn tap(&mut self) {
        self.toggle_play();
    }

    /// Moves focus. While auto-playing, the new card gets a full dwell.
    pub fn advance(&mut self, direction: Direction) {
        let rearm = {
            let mut shared = self.lock();
            if !shared.sequencer.advance(direction) {
                return;
            }
            shared.focused_at = Instant::now();
            let rearm = if shared.sequencer.is_playing() {
                shared.epoch += 1;
                Some(shared.epoch)
            } else {
                None
            };
            shared.publish();
            rearm
        };

        if let Some(epoch) = rearm {
            self.arm(epoch);
        }
    }

    pub fn next(&mut self) {
        self.advance(Direction::Forward);
    }

    pub fn previous(&mut self) {
        self.advance(Direction::Backward);
    }

    /// Turns a horizontal drag into navigation. Returns where it went, if anywhere.
    pub fn on_swipe(&mut self, delta_x: f64) -> Option<Direction> {
        let direction = self.lock().sequencer.swipe_direction(delta_x)?;
        self.advance(direction);
        Some(direction)
    }

    fn arm(&mut self, epoch: u64) {
        // old timers go first, never two sets at once
        self.timers = None;

        let dwell = self.dwell;
        let step = dwell / PROGRESS_STEPS;
        trace!("arming timers for epoch {epoch}, dwell {dwell:?}");

        self.timers = Some(Timers {
            advance: tokio::spawn(advance_loop(self.shared.clone(), epoch, dwell)),
            progress: tokio::spawn(progress_loop(self.shared.clone(), epoch, dwell, step)),
        });
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        lock(&self.shared).epoch += 1;
        self.timers = None;
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn advance_loop(shared: Arc<Mutex<Shared>>, epoch: u64, dwell: Duration) {
    let mut ticker = time::interval_at(Instant::now() + dwell, dwell);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let mut state = lock(&shared);
        if state.epoch != epoch {
            return;
        }

        state.sequencer.next();
        state.focused_at = Instant::now();
        trace!("auto-advanced to {}", state.sequencer.index());
        state.publish();
    }
}

async fn progress_loop(shared: Arc<Mutex<Shared>>, epoch: u64, dwell: Duration, step: Duration) {
    let mut ticker = time::interval_at(Instant::now() + step, step);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let mut state = lock(&shared);
        if state.epoch != epoch {
            return;
        }

        let elapsed = state.focused_at.elapsed().as_secs_f64();
        let progress = (elapsed / dwell.as_secs_f64() * 100.).round().min(100.) as u8;
        if progress != state.sequencer.progress() {
            state.sequencer.set_progress(progress);
            state.publish();
        }
    }
}
