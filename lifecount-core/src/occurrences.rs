//! How many times an activity is left, how many it had in total, and how far along
//! the user is. All pure functions of an activity and an [`AgeContext`].

use crate::{activity::Activity, profile::AgeContext};

fn end_age(activity: &Activity, ctx: &AgeContext) -> f64 {
    activity.age_range.end.resolve(ctx.life_expectancy)
}

/// Occurrences left until the activity's end age, counting from the later of the
/// range start and the current age.
pub fn remaining_occurrences(activity: &Activity, ctx: &AgeContext) -> u64 {
    let end = end_age(activity, ctx);
    if ctx.current_age >= end {
        return 0;
    }

    let start = activity.age_range.start.max(ctx.current_age);
    let count = ((end - start) * activity.frequency.yearly_rate()).floor();
    count.max(0.) as u64
}

/// Occurrences over the whole active range, regardless of current age.
pub fn total_occurrences(activity: &Activity, ctx: &AgeContext) -> u64 {
    let span = (end_age(activity, ctx) - activity.age_range.start).max(0.);
    let count = (span * activity.frequency.yearly_rate()).floor();
    count.max(0.) as u64
}

/// Share of the lifetime total already behind the user, rounded to a whole percent.
/// Nothing to do counts as done.
pub fn completion_percentage(activity: &Activity, ctx: &AgeContext) -> u8 {
    let total = total_occurrences(activity, ctx);
    if total == 0 {
        return 100;
    }

    let remaining = remaining_occurrences(activity, ctx).min(total);
    let done = (total - remaining) as f64 / total as f64;
    (done * 100.).round().clamp(0., 100.) as u8
}
