use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use eyre::Result;
use lifecount_core::{Clock, SystemClock, UserProfile};
use lifecount_fs::Config;

fn show(profile: &UserProfile) -> Result<()> {
    let ctx = profile.resolve(SystemClock.today())?;
    println!(
        "born {}-{:02}, expecting {} years",
        profile.birth_year, profile.birth_month, profile.life_expectancy_years
    );
    println!(
        "{}",
        style(format!(
            "age {}, {} years to go",
            ctx.current_age,
            ctx.years_remaining()
        ))
        .bold()
    );
    Ok(())
}

fn prompt(current: &UserProfile) -> Result<UserProfile> {
    let theme = ColorfulTheme::default();

    let birth_year: i32 = Input::with_theme(&theme)
        .with_prompt("birth year")
        .default(current.birth_year)
        .interact_text()?;
    let birth_month: u32 = Input::with_theme(&theme)
        .with_prompt("birth month (1-12)")
        .default(current.birth_month)
        .validate_with(|month: &u32| {
            if (1..=12).contains(month) {
                Ok(())
            } else {
                Err("must be between 1 and 12")
            }
        })
        .interact_text()?;
    let life_expectancy_years: f64 = Input::with_theme(&theme)
        .with_prompt("life expectancy in years")
        .default(current.life_expectancy_years)
        .interact_text()?;

    Ok(UserProfile::new(birth_year, birth_month, life_expectancy_years))
}

/// Shows the profile, after updating it from the flags given or, without any,
/// from interactive prompts. Only valid profiles get saved.
pub fn profile(
    config: &mut Config,
    birth_year: Option<i32>,
    birth_month: Option<u32>,
    expectancy: Option<f64>,
) -> Result<()> {
    let current = config.profile.clone();

    let updated = if birth_year.is_none() && birth_month.is_none() && expectancy.is_none() {
        if let Err(e) = show(&current) {
            println!("{}", style(e).yellow());
        }
        println!();
        prompt(&current)?
    } else {
        UserProfile::new(
            birth_year.unwrap_or(current.birth_year),
            birth_month.unwrap_or(current.birth_month),
            expectancy.unwrap_or(current.life_expectancy_years),
        )
    };

    updated.validate(SystemClock.today())?;

    if updated != current {
        config.set_profile(updated)?;
        println!("{}", style("saved").green());
    }

    show(&config.profile)
}
