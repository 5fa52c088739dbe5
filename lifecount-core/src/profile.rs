use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
}

/// Who the countdown is for.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub birth_year: i32,
    /// 1-12
    pub birth_month: u32,
    pub life_expectancy_years: f64,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            birth_year: 1990,
            birth_month: 1,
            life_expectancy_years: 80.,
        }
    }
}

impl UserProfile {
    const EARLIEST_BIRTH_YEAR: i32 = 1800;

    pub fn new(birth_year: i32, birth_month: u32, life_expectancy_years: f64) -> Self {
        Self {
            birth_year,
            birth_month,
            life_expectancy_years,
        }
    }

    /// Whole years lived as of the given day. Only the birth month is known, so the
    /// birthday counts as reached from the first of that month.
    pub fn current_age(&self, as_of: NaiveDate) -> f64 {
        let mut age = as_of.year() as i64 - self.birth_year as i64;
        if as_of.month() < self.birth_month {
            age -= 1;
        }
        age as f64
    }

    pub fn years_remaining(&self, as_of: NaiveDate) -> f64 {
        (self.life_expectancy_years - self.current_age(as_of)).max(0.)
    }

    pub fn validate(&self, as_of: NaiveDate) -> Result<(), ProfileError> {
        if !(Self::EARLIEST_BIRTH_YEAR..=as_of.year()).contains(&self.birth_year) {
            return Err(ProfileError::InvalidProfile(format!(
                "birth year must be between {} and {}, got {}",
                Self::EARLIEST_BIRTH_YEAR,
                as_of.year(),
                self.birth_year
            )));
        }

        if !(1..=12).contains(&self.birth_month) {
            return Err(ProfileError::InvalidProfile(format!(
                "birth month must be 1-12, got {}",
                self.birth_month
            )));
        }

        if !self.life_expectancy_years.is_finite() || self.life_expectancy_years < 0. {
            return Err(ProfileError::InvalidProfile(format!(
                "life expectancy must be a non-negative number, got {}",
                self.life_expectancy_years
            )));
        }

        if self.current_age(as_of) < 0. {
            return Err(ProfileError::InvalidProfile(format!(
                "born {}-{:02} is after {as_of}",
                self.birth_year, self.birth_month
            )));
        }

        Ok(())
    }

    /// Pins down the numbers every occurrence calculation in one cycle shares.
    pub fn resolve(&self, as_of: NaiveDate) -> Result<AgeContext, ProfileError> {
        self.validate(as_of)?;
        Ok(AgeContext::new(
            self.current_age(as_of),
            self.life_expectancy_years,
        ))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgeContext {
    pub current_age: f64,
    pub life_expectancy: f64,
}

impl AgeContext {
    pub fn new(current_age: f64, life_expectancy: f64) -> Self {
        Self {
            current_age,
            life_expectancy,
        }
    }

    pub fn years_remaining(&self) -> f64 {
        (self.life_expectancy - self.current_age).max(0.)
    }

    /// The user is at or past their life expectancy, so every countdown reads zero.
    pub fn is_outlived(&self) -> bool {
        self.current_age >= self.life_expectancy
    }
}
