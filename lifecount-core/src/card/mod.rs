use std::sync::Arc;

use crate::{
    activity::{Activity, ActivityId},
    occurrences::{completion_percentage, remaining_occurrences, total_occurrences},
    profile::AgeContext,
};

mod face;

pub use face::*;

/// An activity together with its countdown numbers, ready to display.
#[derive(Clone, Debug, PartialEq)]
pub struct ComputedCard {
    pub activity: Arc<Activity>,
    pub remaining_occurrences: u64,
    pub total_occurrences: u64,
    /// 0-100
    pub completion_percentage: u8,
    pub face: CardFace,
}

impl ComputedCard {
    pub fn compute(activity: Arc<Activity>, ctx: &AgeContext) -> Self {
        let remaining = remaining_occurrences(&activity, ctx);
        let total = total_occurrences(&activity, ctx);
        let completion = completion_percentage(&activity, ctx);
        let face = CardFace::for_activity(&activity, remaining);

        Self {
            activity,
            remaining_occurrences: remaining,
            total_occurrences: total,
            completion_percentage: completion,
            face,
        }
    }

    pub fn id(&self) -> &ActivityId {
        &self.activity.id
    }

    /// Same activity, numbers redone for a new context.
    pub fn recompute(&self, ctx: &AgeContext) -> Self {
        Self::compute(self.activity.clone(), ctx)
    }
}

/// Cards for every active activity, in the given order.
pub fn build_cards(activities: &[Arc<Activity>], ctx: &AgeContext) -> Vec<ComputedCard> {
    activities
        .iter()
        .filter(|activity| activity.is_active)
        .map(|activity| ComputedCard::compute(activity.clone(), ctx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{Frequency, Period};

    #[test]
    fn inactive_are_left_out() {
        let activities = vec![
            Arc::new(Activity::experiential("Sunset", Frequency::new(1., Period::Week))),
            Arc::new(Activity::experiential("Skydive", Frequency::yearly(1.)).inactive()),
        ];
        let cards = build_cards(&activities, &AgeContext::new(30., 80.));
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id().0, "sunset");
        assert_eq!(cards[0].remaining_occurrences, 2600);
        assert_eq!(cards[0].total_occurrences, 4160);
        assert_eq!(cards[0].completion_percentage, 38);
    }

    #[test]
    fn recompute_follows_expectancy() {
        let activity = Arc::new(Activity::experiential("Date", Frequency::new(2., Period::Month)));
        let card = ComputedCard::compute(activity, &AgeContext::new(57., 77.));
        assert_eq!(card.remaining_occurrences, 480);

        let card = card.recompute(&AgeContext::new(57., 67.));
        assert_eq!(card.remaining_occurrences, 240);
        assert_eq!(card.face, CardFace::Count { remaining: 240 });
    }
}
