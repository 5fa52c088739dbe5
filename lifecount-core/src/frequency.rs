use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::warn;

#[derive(
    Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    #[default]
    Year,
    /// Anything we don't recognize. Counts as once a year.
    #[serde(other)]
    Unknown,
}

impl Period {
    pub fn yearly_multiplier(&self) -> f64 {
        match self {
            Period::Day => 365.,
            Period::Week => 52.,
            Period::Month => 12.,
            Period::Year => 1.,
            Period::Unknown => 1.,
        }
    }
}

/// How often something happens, e.g. twice a month.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(from = "FrequencyRepr")]
pub struct Frequency {
    pub times: f64,
    pub period: Period,
}

impl Frequency {
    pub fn new(times: f64, period: Period) -> Self {
        Self { times, period }
    }

    pub fn yearly(times: f64) -> Self {
        Self::new(times, Period::Year)
    }

    /// Occurrences per year. Negative or NaN counts end up as zero.
    pub fn yearly_rate(&self) -> f64 {
        self.times.max(0.) * self.period.yearly_multiplier()
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self::yearly(1.)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.times, self.period)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unrecognized frequency: {0:?}")]
pub struct FrequencyParseError(pub String);

impl FromStr for Frequency {
    type Err = FrequencyParseError;

    /// Parses `daily`, `weekly`, `every month`, `annually`, ... and `<n>/<period>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();

        let named = match normalized.as_str() {
            "daily" | "everyday" | "every day" => Some(Period::Day),
            "weekly" | "every week" => Some(Period::Week),
            "monthly" | "every month" => Some(Period::Month),
            "yearly" | "annually" | "every year" => Some(Period::Year),
            _ => None,
        };

        if let Some(period) = named {
            return Ok(Self::new(1., period));
        }

        let err = || FrequencyParseError(s.to_string());
        let (times, period) = normalized.split_once('/').ok_or_else(err)?;
        let times: f64 = times.trim().parse().map_err(|_| err())?;
        let period = period.trim();
        let period = Period::from_str(period)
            .or_else(|_| Period::from_str(period.trim_end_matches('s')))
            .map_err(|_| err())?;

        Ok(Self::new(times, period))
    }
}

/// Every shape a frequency shows up in on disk.
#[derive(Deserialize)]
#[serde(untagged)]
enum FrequencyRepr {
    Full {
        times: f64,
        #[serde(default)]
        period: Period,
    },
    /// Legacy files stored a single yearly number.
    Yearly(f64),
    Shorthand(String),
}

impl From<FrequencyRepr> for Frequency {
    fn from(value: FrequencyRepr) -> Self {
        match value {
            FrequencyRepr::Full { times, period } => Self::new(times, period),
            FrequencyRepr::Yearly(times) => Self::yearly(times),
            FrequencyRepr::Shorthand(s) => s.parse().unwrap_or_else(|e| {
                warn!("{e}, defaulting to 1/year");
                Self::default()
            }),
        }
    }
}
