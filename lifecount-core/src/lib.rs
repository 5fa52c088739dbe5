use std::{fmt::Debug, sync::Arc};

use card::build_cards;
use rand::Rng;
use tokio::sync::watch;
use tracing::{debug, info};

pub mod activity;
pub mod card;
mod common;
pub mod config;
pub mod frequency;
pub mod occurrences;
pub mod player;
pub mod profile;
pub mod sequencer;
pub mod summary;

pub use activity::{Activity, ActivityFile, ActivityId, ActivityKind, AgeEnd, AgeRange, Financial};
pub use card::{CardFace, ComputedCard, Money};
pub use common::{truncate_string, Clock, FixedClock, SystemClock};
pub use config::Settings;
pub use frequency::{Frequency, Period};
pub use player::Player;
pub use profile::{AgeContext, ProfileError, UserProfile};
pub use sequencer::{Direction, Presentation, SequencerState};
pub use summary::DataSummary;

/// Ties the pieces together: the activity set and profile go in, a rotating
/// sequence of computed cards comes out.
pub struct App {
    profile: UserProfile,
    activities: Vec<Arc<Activity>>,
    clock: Arc<dyn Clock>,
    player: Player,
    autoplay: bool,
}

impl Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "app!")
    }
}

impl App {
    pub fn new<C>(settings: Settings, profile: UserProfile, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        info!("initialize app");

        Self {
            profile,
            activities: vec![],
            clock: Arc::new(clock),
            player: Player::new(&settings),
            autoplay: settings.autoplay,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn activities(&self) -> &[Arc<Activity>] {
        &self.activities
    }

    /// The profile as of today.
    pub fn age_context(&self) -> Result<AgeContext, ProfileError> {
        self.profile.resolve(self.clock.today())
    }

    pub fn years_remaining(&self) -> f64 {
        self.profile.years_remaining(self.clock.today())
    }

    pub fn load_activities(&mut self, activities: Vec<Activity>) -> Result<(), ProfileError> {
        self.load_activities_with_rng(activities, &mut rand::thread_rng())
    }

    /// Swaps in a new activity set. Cards are rebuilt and shuffled once, and start
    /// rotating if auto-play is on in the settings.
    pub fn load_activities_with_rng<R: Rng + ?Sized>(
        &mut self,
        activities: Vec<Activity>,
        rng: &mut R,
    ) -> Result<(), ProfileError> {
        let ctx = self.age_context()?;
        self.activities = activities.into_iter().map(Arc::new).collect();
        let cards = build_cards(&self.activities, &ctx);
        info!(
            "loaded {} activities, {} active",
            self.activities.len(),
            cards.len()
        );
        self.player.load(cards, rng);
        if self.autoplay {
            self.player.play();
        }
        Ok(())
    }

    /// Replaces the profile and redoes every card, keeping the current order. An
    /// invalid profile is rejected and the old one stays.
    pub fn set_profile(&mut self, profile: UserProfile) -> Result<(), ProfileError> {
        let ctx = profile.resolve(self.clock.today())?;
        debug!("new profile: {profile:?}");
        self.profile = profile;
        self.player.refresh(|card| card.recompute(&ctx));
        Ok(())
    }

    /// Cards for every active activity, in data order rather than display order.
    pub fn compute_cards(&self) -> Result<Vec<ComputedCard>, ProfileError> {
        let ctx = self.age_context()?;
        Ok(build_cards(&self.activities, &ctx))
    }

    /// Cards in the order they rotate through.
    pub fn cards(&self) -> Vec<ComputedCard> {
        self.player.cards()
    }

    pub fn summary(&self) -> DataSummary {
        let ctx = self.age_context().ok();
        DataSummary::new(self.activities.iter().map(|a| a.as_ref()), ctx.as_ref())
    }

    pub fn subscribe(&self) -> watch::Receiver<Presentation> {
        self.player.subscribe()
    }

    pub fn presentation(&self) -> Presentation {
        self.player.presentation()
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_playing()
    }

    pub fn play(&mut self) {
        self.player.play();
    }

    pub fn pause(&mut self) {
        self.player.pause();
    }

    pub fn toggle_play(&mut self) {
        self.player.toggle_play();
    }

    /// A tap on the focused card.
    pub fn tap(&mut self) {
        self.player.tap();
    }

    pub fn next(&mut self) {
        self.player.next();
    }

    pub fn previous(&mut self) {
        self.player.previous();
    }

    pub fn on_swipe(&mut self, delta_x: f64) -> Option<Direction> {
        self.player.on_swipe(delta_x)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn app() -> App {
        App::new(
            Settings::default(),
            UserProfile::new(1967, 1, 77.),
            FixedClock(today()),
        )
    }

    fn netflix() -> Activity {
        Activity::financial(
            "Netflix",
            Frequency::new(1., Period::Month),
            Financial {
                amount: 15.99,
                unit: "month".into(),
                currency: "USD".into(),
            },
        )
    }

    #[tokio::test]
    async fn scenario_57_of_77() {
        let mut app = app();
        app.load_activities_with_rng(
            vec![
                Activity::experiential("Date night", Frequency::new(2., Period::Month)),
                netflix().inactive(),
            ],
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();

        assert_eq!(app.age_context().unwrap().current_age, 57.);
        assert_eq!(app.years_remaining(), 20.);

        let Presentation::Focused { card, len, .. } = app.presentation() else {
            panic!("expected a card");
        };
        assert_eq!(len, 1);
        assert_eq!(card.remaining_occurrences, 480);
        assert_eq!(card.face.headline(), "480");
    }

    #[tokio::test]
    async fn financial_card() {
        let mut app = app();
        app.load_activities(vec![Activity::financial(
            "Date fund",
            Frequency::new(2., Period::Month),
            Financial {
                amount: 15.99,
                unit: "month".into(),
                currency: "USD".into(),
            },
        )])
        .unwrap();

        let cards = app.compute_cards().unwrap();
        assert_eq!(cards[0].remaining_occurrences, 480);
        assert_eq!(cards[0].face.headline(), "$7675.20");
    }

    #[tokio::test]
    async fn set_profile_recomputes_in_place() {
        let mut app = app();
        let activities = ["a", "b", "c"]
            .into_iter()
            .map(|name| Activity::experiential(name, Frequency::yearly(1.)))
            .collect();
        app.load_activities_with_rng(activities, &mut StdRng::seed_from_u64(9))
            .unwrap();
        app.next();

        let before: Vec<_> = app.cards().iter().map(|c| c.id().clone()).collect();

        app.set_profile(UserProfile::new(1967, 1, 87.)).unwrap();

        let after = app.cards();
        assert_eq!(
            before,
            after.iter().map(|c| c.id().clone()).collect::<Vec<_>>()
        );
        assert!(after.iter().all(|c| c.remaining_occurrences == 30));
        assert!(matches!(
            app.presentation(),
            Presentation::Focused { position: 1, .. }
        ));
    }

    #[tokio::test]
    async fn invalid_profile_is_rejected() {
        let mut app = app();
        let err = app.set_profile(UserProfile::new(1967, 14, 77.)).unwrap_err();
        assert!(matches!(err, ProfileError::InvalidProfile(_)));
        assert_eq!(app.profile(), &UserProfile::new(1967, 1, 77.));
    }

    #[tokio::test]
    async fn outlived_is_zero_not_loading() {
        let mut app = App::new(
            Settings::default(),
            UserProfile::new(1940, 1, 80.),
            FixedClock(today()),
        );
        assert_eq!(app.presentation(), Presentation::Loading);

        app.load_activities(vec![Activity::experiential("Walk", Frequency::new(1., Period::Day))])
            .unwrap();

        assert!(app.age_context().unwrap().is_outlived());
        assert_eq!(app.years_remaining(), 0.);
        let Presentation::Focused { card, .. } = app.presentation() else {
            panic!("expected a card");
        };
        assert_eq!(card.remaining_occurrences, 0);
        assert_eq!(card.completion_percentage, 100);
    }

    #[tokio::test]
    async fn all_inactive_is_no_data() {
        let mut app = app();
        app.load_activities(vec![netflix().inactive()]).unwrap();
        assert_eq!(app.presentation(), Presentation::NoData);
        app.play();
        assert!(!app.is_playing());
        app.next();
        assert_eq!(app.presentation(), Presentation::NoData);
    }

    #[tokio::test]
    async fn autoplay_follows_settings() {
        let mut app = app();
        app.load_activities(vec![netflix()]).unwrap();
        assert!(app.is_playing());

        let settings = Settings {
            autoplay: false,
            ..Default::default()
        };
        let mut app = App::new(settings, UserProfile::default(), FixedClock(today()));
        app.load_activities(vec![netflix()]).unwrap();
        assert!(!app.is_playing());
        app.tap();
        assert!(app.is_playing());
        app.pause();
        assert!(!app.is_playing());
    }

    #[tokio::test]
    async fn summary_uses_profile() {
        let mut app = app();
        app.load_activities(vec![netflix()]).unwrap();
        let summary = app.summary();
        assert_eq!(summary.total, 1);
        assert!((summary.remaining_spend["USD"] - 15.99 * 240.).abs() < 1e-6);
    }
}
