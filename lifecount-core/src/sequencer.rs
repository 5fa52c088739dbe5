use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};
use tracing::{debug, warn};

use crate::card::ComputedCard;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequencerState {
    /// Nothing loaded yet.
    Idle,
    /// Loaded, but no active cards.
    Empty,
    Ready,
    AutoPlaying,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// What a renderer should show right now.
#[derive(Clone, Debug, PartialEq)]
pub enum Presentation {
    Loading,
    NoData,
    Focused {
        card: ComputedCard,
        /// 0-based
        position: usize,
        len: usize,
        autoplay: bool,
        /// 0-100
        progress: u8,
    },
}

/// The rotation state machine. Owns the shuffled cards, which one has focus,
/// whether we're auto-playing and how far the current card's dwell has come.
///
/// Time never enters here; timers live in [`crate::player::Player`].
#[derive(Debug)]
pub struct Sequencer {
    cards: Vec<ComputedCard>,
    index: usize,
    state: SequencerState,
    progress: u8,
    swipe_threshold: f64,
}

impl Sequencer {
    pub fn new(swipe_threshold: f64) -> Self {
        Self {
            cards: vec![],
            index: 0,
            state: SequencerState::Idle,
            progress: 0,
            swipe_threshold,
        }
    }

    /// Replaces the cards with a shuffled copy, dropping duplicate ids. Focus goes
    /// back to the first card. Auto-play survives a reload unless nothing is left.
    pub fn load<R: Rng + ?Sized>(&mut self, cards: Vec<ComputedCard>, rng: &mut R) {
        let mut seen = HashSet::new();
        let mut cards: Vec<ComputedCard> = cards
            .into_iter()
            .filter(|card| {
                let fresh = seen.insert(card.id().clone());
                if !fresh {
                    warn!("duplicate activity id {}, keeping the first", card.id());
                }
                fresh
            })
            .collect();

        cards.shuffle(rng);

        self.cards = cards;
        self.index = 0;
        self.progress = 0;
        self.state = match (self.cards.is_empty(), self.state) {
            (true, _) => SequencerState::Empty,
            (false, SequencerState::AutoPlaying) => SequencerState::AutoPlaying,
            (false, _) => SequencerState::Ready,
        };

        debug!("loaded {} cards, state: {:?}", self.cards.len(), self.state);
    }

    /// Redoes every card in place, keeping order and focus.
    pub fn refresh(&mut self, mut f: impl FnMut(&ComputedCard) -> ComputedCard) {
        for card in self.cards.iter_mut() {
            *card = f(card);
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == SequencerState::AutoPlaying
    }

    pub fn cards(&self) -> &[ComputedCard] {
        &self.cards
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&ComputedCard> {
        self.cards.get(self.index)
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Only moves while auto-playing.
    pub fn set_progress(&mut self, progress: u8) {
        if self.is_playing() {
            self.progress = progress.min(100);
        }
    }

    /// Moves focus one step, wrapping around. Returns false if there's nothing to
    /// move through.
    pub fn advance(&mut self, direction: Direction) -> bool {
        let len = self.cards.len();
        if len == 0 {
            return false;
        }

        self.index = match direction {
            Direction::Forward => (self.index + 1) % len,
            Direction::Backward => (self.index + len - 1) % len,
        };
        self.progress = 0;
        true
    }

    pub fn next(&mut self) -> bool {
        self.advance(Direction::Forward)
    }

    pub fn previous(&mut self) -> bool {
        self.advance(Direction::Backward)
    }

    /// Returns whether we're auto-playing afterwards.
    pub fn play(&mut self) -> bool {
        match self.state {
            SequencerState::Ready => {
                self.state = SequencerState::AutoPlaying;
                self.progress = 0;
                true
            }
            SequencerState::AutoPlaying => true,
            SequencerState::Idle | SequencerState::Empty => false,
        }
    }

    pub fn pause(&mut self) {
        if self.state == SequencerState::AutoPlaying {
            self.state = SequencerState::Ready;
        }
        self.progress = 0;
    }

    /// Left swipes (negative delta) go forward, right swipes go back. Drags that
    /// don't pass the threshold are ignored.
    pub fn swipe_direction(&self, delta_x: f64) -> Option<Direction> {
        if delta_x.abs() <= self.swipe_threshold || delta_x.is_nan() {
            return None;
        }

        if delta_x < 0. {
            Some(Direction::Forward)
        } else {
            Some(Direction::Backward)
        }
    }

    pub fn presentation(&self) -> Presentation {
        match self.state {
            SequencerState::Idle => Presentation::Loading,
            SequencerState::Empty => Presentation::NoData,
            SequencerState::Ready | SequencerState::AutoPlaying => match self.current() {
                Some(card) => Presentation::Focused {
                    card: card.clone(),
                    position: self.index,
                    len: self.cards.len(),
                    autoplay: self.is_playing(),
                    progress: self.progress,
                },
                None => Presentation::NoData,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        activity::Activity,
        card::build_cards,
        frequency::Frequency,
        profile::AgeContext,
    };

    fn cards(names: &[&str]) -> Vec<ComputedCard> {
        let activities: Vec<Arc<Activity>> = names
            .iter()
            .map(|name| Arc::new(Activity::experiential(*name, Frequency::yearly(1.))))
            .collect();
        build_cards(&activities, &AgeContext::new(30., 80.))
    }

    fn loaded(names: &[&str]) -> Sequencer {
        let mut seq = Sequencer::new(50.);
        seq.load(cards(names), &mut StdRng::seed_from_u64(7));
        seq
    }

    #[test]
    fn starts_idle() {
        let seq = Sequencer::new(50.);
        assert_eq!(seq.state(), SequencerState::Idle);
        assert_eq!(seq.presentation(), Presentation::Loading);
    }

    #[test]
    fn load_shuffles_keeps_everything() {
        let seq = loaded(&["a", "b", "c", "d", "e"]);
        assert_eq!(seq.state(), SequencerState::Ready);
        assert_eq!(seq.index(), 0);

        let mut ids: Vec<String> = seq.cards().iter().map(|c| c.id().0.clone()).collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn duplicates_are_dropped() {
        let seq = loaded(&["a", "b", "a"]);
        assert_eq!(seq.cards().len(), 2);
    }

    #[test]
    fn cycles_back_to_start() {
        let mut seq = loaded(&["a", "b", "c", "d"]);
        let start = seq.current().unwrap().id().clone();
        for _ in 0..4 {
            assert!(seq.next());
        }
        assert_eq!(seq.current().unwrap().id(), &start);

        assert!(seq.previous());
        assert_eq!(seq.index(), 3);
    }

    #[test]
    fn empty_is_no_data() {
        let mut seq = loaded(&[]);
        assert_eq!(seq.state(), SequencerState::Empty);
        assert_eq!(seq.presentation(), Presentation::NoData);
        assert!(!seq.next());
        assert!(!seq.previous());
        assert!(!seq.play());
        assert_eq!(seq.presentation(), Presentation::NoData);
    }

    #[test]
    fn play_pause_and_progress() {
        let mut seq = loaded(&["a", "b"]);
        seq.set_progress(40);
        assert_eq!(seq.progress(), 0, "progress only moves while playing");

        assert!(seq.play());
        seq.set_progress(40);
        assert_eq!(seq.progress(), 40);

        seq.next();
        assert_eq!(seq.progress(), 0);
        assert!(seq.is_playing(), "advancing keeps the play state");

        seq.set_progress(250);
        assert_eq!(seq.progress(), 100);

        seq.pause();
        assert_eq!(seq.state(), SequencerState::Ready);
        assert_eq!(seq.progress(), 0);
    }

    #[test]
    fn reload_keeps_autoplay_unless_empty() {
        let mut seq = loaded(&["a", "b"]);
        seq.play();
        seq.load(cards(&["c"]), &mut StdRng::seed_from_u64(1));
        assert!(seq.is_playing());

        seq.load(vec![], &mut StdRng::seed_from_u64(1));
        assert_eq!(seq.state(), SequencerState::Empty);

        seq.load(cards(&["d"]), &mut StdRng::seed_from_u64(1));
        assert_eq!(seq.state(), SequencerState::Ready);
    }

    #[test]
    fn swipes() {
        let seq = loaded(&["a"]);
        assert_eq!(seq.swipe_direction(-60.), Some(Direction::Forward));
        assert_eq!(seq.swipe_direction(60.), Some(Direction::Backward));
        assert_eq!(seq.swipe_direction(-30.), None);
        assert_eq!(seq.swipe_direction(50.), None);
        assert_eq!(seq.swipe_direction(f64::NAN), None);
    }

    #[test]
    fn refresh_keeps_order() {
        let mut seq = loaded(&["a", "b", "c"]);
        seq.next();
        let order: Vec<_> = seq.cards().iter().map(|c| c.id().clone()).collect();

        let ctx = AgeContext::new(70., 80.);
        seq.refresh(|card| card.recompute(&ctx));

        let after: Vec<_> = seq.cards().iter().map(|c| c.id().clone()).collect();
        assert_eq!(order, after);
        assert_eq!(seq.index(), 1);
        assert_eq!(seq.current().unwrap().remaining_occurrences, 10);
    }
}
