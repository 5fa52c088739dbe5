use chrono::{Local, NaiveDate};

/// Source of "today" for age calculations.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stuck on one day, handy for tests and for previewing other dates.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Safe way to truncate string.
pub fn truncate_string(input: &str, max_len: usize) -> String {
    let mut chars = input.chars();
    let mut result: String = chars.by_ref().take(max_len).collect();
    if chars.next().is_some() {
        result.push('…');
    }
    result
}
