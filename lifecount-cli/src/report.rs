use console::style;
use eyre::Result;
use lifecount_core::{truncate_string, ActivityKind, App, ComputedCard};
use strum::IntoEnumIterator;

pub fn list(app: &App, all: bool) -> Result<()> {
    let ctx = app.age_context()?;

    let mut cards: Vec<ComputedCard> = if all {
        app.activities()
            .iter()
            .map(|activity| ComputedCard::compute(activity.clone(), &ctx))
            .collect()
    } else {
        app.compute_cards()?
    };
    cards.sort_by(|a, b| {
        a.activity
            .category
            .cmp(&b.activity.category)
            .then_with(|| a.activity.name.cmp(&b.activity.name))
    });

    println!(
        "{}",
        style(format!(
            "age {}, {} years to go",
            ctx.current_age,
            ctx.years_remaining()
        ))
        .bold()
    );
    println!();
    println!(
        "{:<32} {:<14} {:<12} {:>10} {:>5}",
        "activity", "category", "frequency", "left", "done"
    );

    for card in &cards {
        let activity = &card.activity;
        let line = format!(
            "{:<32} {:<14} {:<12} {:>10} {:>4}%",
            truncate_string(&activity.name, 31),
            truncate_string(&activity.category, 13),
            activity.frequency.to_string(),
            card.face.headline(),
            card.completion_percentage,
        );

        if activity.is_active {
            println!("{line}");
        } else {
            println!("{}", style(line).dim());
        }
    }

    if ctx.is_outlived() {
        println!();
        println!("{}", style("you've outlived the expectancy, every count is zero").yellow());
    }

    Ok(())
}

pub fn summary(app: &App) {
    let summary = app.summary();

    println!("{}", style("activities").bold());
    println!("  total:        {}", summary.total);
    println!(
        "  active:       {} ({:.1}%)",
        summary.active,
        summary.share(summary.active)
    );
    println!("  user created: {}", summary.user_created);
    println!("  fixed end:    {}", summary.with_fixed_end);

    println!();
    println!("{}", style("by type").bold());
    for kind in ActivityKind::iter() {
        let count = summary.by_kind.get(&kind).copied().unwrap_or_default();
        println!("  {:<13} {:>4} ({:.1}%)", kind.to_string(), count, summary.share(count));
    }

    println!();
    println!(
        "{}",
        style(format!("top categories ({} in total)", summary.category_count)).bold()
    );
    for (category, count) in &summary.top_categories {
        println!("  {:<13} {:>4}", category, count);
    }

    if !summary.per_unit_totals.is_empty() {
        println!();
        println!("{}", style("money").bold());
        for (currency, total) in &summary.per_unit_totals {
            let remaining = summary.remaining_spend.get(currency).copied().unwrap_or_default();
            println!("  {currency}: {total:.2} per cycle, {remaining:.2} over the rest of your life");
        }
    }
}
