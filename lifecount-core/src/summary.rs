use std::collections::{BTreeMap, HashMap};

use crate::{
    activity::{Activity, ActivityKind, AgeEnd},
    occurrences::remaining_occurrences,
    profile::AgeContext,
};

/// Overview of an activity set: what kinds, which categories, how much money.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSummary {
    pub total: usize,
    pub active: usize,
    pub user_created: usize,
    pub with_fixed_end: usize,
    pub by_kind: BTreeMap<ActivityKind, usize>,
    /// Most common first, at most ten.
    pub top_categories: Vec<(String, usize)>,
    pub category_count: usize,
    /// Sum of one payment of every financial activity, per currency.
    pub per_unit_totals: BTreeMap<String, f64>,
    /// What the active financial activities still cost over a lifetime, per currency.
    pub remaining_spend: BTreeMap<String, f64>,
}

impl DataSummary {
    pub const TOP_CATEGORIES: usize = 10;

    pub fn new<'a>(
        activities: impl IntoIterator<Item = &'a Activity>,
        ctx: Option<&AgeContext>,
    ) -> Self {
        let mut summary = Self::default();
        let mut categories: HashMap<&str, usize> = HashMap::new();

        for activity in activities {
            summary.total += 1;
            *summary.by_kind.entry(activity.kind).or_default() += 1;
            *categories.entry(activity.category.as_str()).or_default() += 1;

            if activity.is_active {
                summary.active += 1;
            }
            if activity.user_created {
                summary.user_created += 1;
            }
            if matches!(activity.age_range.end, AgeEnd::Fixed(_)) {
                summary.with_fixed_end += 1;
            }

            let Some(financial) = &activity.financial else {
                continue;
            };

            *summary
                .per_unit_totals
                .entry(financial.currency.clone())
                .or_default() += financial.amount;

            if let (Some(ctx), true) = (ctx, activity.is_active) {
                let remaining = remaining_occurrences(activity, ctx) as f64;
                *summary
                    .remaining_spend
                    .entry(financial.currency.clone())
                    .or_default() += financial.amount * remaining;
            }
        }

        let mut categories: Vec<(String, usize)> = categories
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        summary.category_count = categories.len();
        categories.truncate(Self::TOP_CATEGORIES);
        summary.top_categories = categories;

        summary
    }

    /// Share of all activities, as a percentage.
    pub fn share(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.
        } else {
            count as f64 / self.total as f64 * 100.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        activity::{AgeRange, Financial},
        frequency::{Frequency, Period},
    };

    fn money(amount: f64, currency: &str) -> Financial {
        Financial {
            amount,
            unit: "month".into(),
            currency: currency.into(),
        }
    }

    fn sample() -> Vec<Activity> {
        let monthly = Frequency::new(1., Period::Month);
        vec![
            Activity::experiential("Sunset", Frequency::new(1., Period::Week)).with_category("nature"),
            Activity::experiential("Hike", Frequency::new(1., Period::Month))
                .with_category("nature")
                .with_age_range(AgeRange::new(0., AgeEnd::Fixed(70.))),
            Activity::financial("Netflix", monthly, money(15.99, "USD")).with_category("subscriptions"),
            Activity::financial("Spotify", monthly, money(10., "USD"))
                .with_category("subscriptions")
                .inactive(),
            Activity::financial("Rent", monthly, money(900., "EUR")).with_category("housing"),
            Activity::quote("Seneca", "Carpe diem - Horace").with_category("reflection"),
        ]
    }

    #[test]
    fn counts() {
        let activities = sample();
        let summary = DataSummary::new(&activities, None);

        assert_eq!(summary.total, 6);
        assert_eq!(summary.active, 5);
        assert_eq!(summary.with_fixed_end, 1);
        assert_eq!(summary.by_kind[&ActivityKind::Financial], 3);
        assert_eq!(summary.by_kind[&ActivityKind::Experiential], 2);
        assert_eq!(summary.by_kind[&ActivityKind::Quote], 1);
        assert_eq!(summary.category_count, 4);
        assert_eq!(summary.top_categories[0], ("nature".to_string(), 2));
        assert_eq!(summary.top_categories[1], ("subscriptions".to_string(), 2));
        assert!((summary.per_unit_totals["USD"] - 25.99).abs() < 1e-9);
        assert_eq!(summary.per_unit_totals["EUR"], 900.);
        assert!(summary.remaining_spend.is_empty());
        assert!((summary.share(summary.active) - 83.333).abs() < 0.01);
    }

    #[test]
    fn remaining_spend_skips_inactive() {
        let activities = sample();
        let ctx = AgeContext::new(57., 77.);
        let summary = DataSummary::new(&activities, Some(&ctx));

        // 240 more months of netflix, spotify is inactive
        assert!((summary.remaining_spend["USD"] - 15.99 * 240.).abs() < 1e-6);
        assert_eq!(summary.remaining_spend["EUR"], 900. * 240.);
    }

    #[test]
    fn empty() {
        let none: Vec<Activity> = vec![];
        let summary = DataSummary::new(&none, None);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.share(0), 0.);
    }
}
