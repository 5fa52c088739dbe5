use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, warn};

use crate::frequency::Frequency;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "IdRepr")]
pub struct ActivityId(pub String);

impl ActivityId {
    /// "Watch a Sunset!" -> "watch_a_sunset"
    pub fn from_name(name: &str) -> Self {
        let lowered = name.trim().to_lowercase();
        let kept: String = lowered
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
            .collect();

        let id = kept
            .split(|c: char| c == '-' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");

        Self(id)
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(i64),
}

impl From<IdRepr> for ActivityId {
    fn from(value: IdRepr) -> Self {
        match value {
            IdRepr::Text(s) => Self(s),
            IdRepr::Number(n) => Self(n.to_string()),
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActivityKind {
    /// Something you do or witness, counted in occurrences.
    #[default]
    Experiential,
    /// A recurring cost, counted in money.
    Financial,
    /// A quote to reflect on, not counted at all.
    Quote,
}

impl ActivityKind {
    /// Unknown tags fall back to experiential.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        Self::from_str(&tag).unwrap_or_else(|_| {
            warn!("unknown activity type {tag:?}, treating as experiential");
            Self::Experiential
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum AgeEnd {
    Fixed(f64),
    /// Follows the user's life expectancy, whatever it is at calculation time.
    Flexible,
}

impl AgeEnd {
    pub fn resolve(&self, life_expectancy: f64) -> f64 {
        match self {
            AgeEnd::Fixed(age) => *age,
            AgeEnd::Flexible => life_expectancy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AgeRange {
    pub start: f64,
    pub end: AgeEnd,
}

impl Default for AgeRange {
    fn default() -> Self {
        Self {
            start: 0.,
            end: AgeEnd::Flexible,
        }
    }
}

impl AgeRange {
    pub fn new(start: f64, end: AgeEnd) -> Self {
        Self { start, end }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Financial {
    pub amount: f64,
    /// What one payment covers, e.g. "month".
    pub unit: String,
    /// ISO 4217 code, upper case.
    pub currency: String,
}

/// A fully defaulted activity. Everything downstream assumes these fields are set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub kind: ActivityKind,
    pub frequency: Frequency,
    pub age_range: AgeRange,
    /// Set iff `kind` is financial.
    pub financial: Option<Financial>,
    pub is_active: bool,
    pub user_created: bool,
}

impl Activity {
    pub fn new(name: impl Into<String>, kind: ActivityKind, frequency: Frequency) -> Self {
        let name = name.into();
        let category = "default".to_string();
        let (icon, color) = category_style(&category);

        Self {
            id: ActivityId::from_name(&name),
            name,
            category,
            description: String::new(),
            icon: icon.to_string(),
            color: color.to_string(),
            kind,
            frequency,
            age_range: AgeRange::default(),
            financial: None,
            is_active: true,
            user_created: true,
        }
    }

    pub fn experiential(name: impl Into<String>, frequency: Frequency) -> Self {
        Self::new(name, ActivityKind::Experiential, frequency)
    }

    pub fn financial(name: impl Into<String>, frequency: Frequency, financial: Financial) -> Self {
        let mut activity = Self::new(name, ActivityKind::Financial, frequency);
        activity.financial = Some(financial);
        activity
    }

    pub fn quote(name: impl Into<String>, description: impl Into<String>) -> Self {
        let mut activity = Self::new(name, ActivityKind::Quote, Frequency::default());
        activity.description = description.into();
        activity
    }

    pub fn with_age_range(mut self, age_range: AgeRange) -> Self {
        self.age_range = age_range;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Default icon and color for a category.
pub fn category_style(category: &str) -> (&'static str, &'static str) {
    match category {
        "celebration" => ("🎉", "#FFD700"),
        "nature" => ("🌳", "#FF6347"),
        "routine" => ("☕", "#4A90E2"),
        "exercise" => ("💪", "#2ECC71"),
        "social" => ("👥", "#E74C3C"),
        "learning" => ("📚", "#9B59B6"),
        "travel" => ("✈️", "#1ABC9C"),
        "food" => ("🍽️", "#F39C12"),
        "work" => ("💼", "#34495E"),
        "hobby" => ("🎨", "#16A085"),
        "subscriptions" => ("📊", "#7C3AED"),
        "insurance" => ("🛡️", "#2563EB"),
        "utilities" => ("🔌", "#059669"),
        "housing" => ("🏠", "#DC2626"),
        "transportation" => ("🚗", "#F59E0B"),
        "financial" => ("💰", "#10B981"),
        "reflection" => ("💭", "#8B5CF6"),
        _ => ("⭐", "#95A5A6"),
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("activity has no name")]
    MissingName,
}

/// An activity record as found on disk. Fields are loose and optional, both the
/// converter's nested layout and the flat app layout are accepted.
#[derive(Debug, Default, Deserialize)]
pub struct RawActivity {
    id: Option<ActivityId>,
    name: Option<String>,
    category: Option<String>,
    description: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    frequency: Option<Frequency>,
    #[serde(alias = "ageRange")]
    age_range: Option<RawAgeRange>,
    icon: Option<String>,
    color: Option<String>,
    display: Option<RawDisplay>,
    financial: Option<RawFinancial>,
    quote: Option<RawQuote>,
    #[serde(alias = "isActive")]
    is_active: Option<bool>,
    metadata: Option<RawMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAgeRange {
    start: Option<f64>,
    end: Option<RawAgeEnd>,
    #[serde(alias = "flexibleEnd")]
    flexible_end: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAgeEnd {
    Age(f64),
    Tag(String),
}

#[derive(Debug, Default, Deserialize)]
struct RawDisplay {
    icon: Option<String>,
    color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFinancial {
    amount: Option<f64>,
    unit: Option<String>,
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawQuote {
    text: String,
    author: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(alias = "isActive")]
    is_active: Option<bool>,
    #[serde(alias = "userCreated")]
    user_created: Option<bool>,
}

impl RawAgeRange {
    fn normalize(self) -> AgeRange {
        let start = self.start.unwrap_or(0.).max(0.);

        let end = match (self.end, self.flexible_end) {
            (_, Some(true)) | (None, _) => AgeEnd::Flexible,
            (Some(RawAgeEnd::Age(age)), _) => AgeEnd::Fixed(age),
            (Some(RawAgeEnd::Tag(tag)), _) => {
                if !tag.eq_ignore_ascii_case("flexible") {
                    warn!("unknown age range end {tag:?}, treating as flexible");
                }
                AgeEnd::Flexible
            }
        };

        AgeRange { start, end }
    }
}

impl RawFinancial {
    fn normalize(self, name: &str) -> Option<Financial> {
        let Some(amount) = self.amount else {
            warn!("financial activity {name:?} has no amount");
            return None;
        };

        let currency = self
            .currency
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "USD".to_string());

        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            warn!("currency {currency:?} of {name:?} should be a 3-letter code");
        }

        let unit = self
            .unit
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| "occurrence".to_string());

        Some(Financial {
            amount,
            unit,
            currency,
        })
    }
}

impl RawActivity {
    pub fn normalize(self) -> Result<Activity, NormalizeError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(NormalizeError::MissingName)?;

        let id = self.id.unwrap_or_else(|| ActivityId::from_name(&name));

        let category = self
            .category
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "default".to_string());

        let mut kind = self
            .kind
            .as_deref()
            .map(ActivityKind::from_tag)
            .unwrap_or_default();

        let description = match (self.description, self.quote) {
            (Some(desc), _) => desc.trim().to_string(),
            (None, Some(RawQuote { text, author: Some(author) })) => format!("{text} - {author}"),
            (None, Some(RawQuote { text, author: None })) => text,
            (None, None) => String::new(),
        };

        let frequency = match (self.frequency, kind) {
            (Some(freq), _) => freq,
            (None, ActivityKind::Quote) => Frequency::yearly(1.),
            (None, _) => {
                warn!("activity {name:?} has no frequency, defaulting to 1/year");
                Frequency::default()
            }
        };

        let financial = match kind {
            ActivityKind::Financial => {
                let financial = self.financial.unwrap_or_default().normalize(&name);
                if financial.is_none() {
                    kind = ActivityKind::Experiential;
                }
                financial
            }
            _ => None,
        };

        let display = self.display.unwrap_or_default();
        let (default_icon, default_color) = category_style(&category);
        let icon = self
            .icon
            .or(display.icon)
            .unwrap_or_else(|| default_icon.to_string());
        let color = self
            .color
            .or(display.color)
            .unwrap_or_else(|| default_color.to_string());

        let metadata = self.metadata.unwrap_or_default();
        let is_active = self.is_active.or(metadata.is_active).unwrap_or(true);
        let user_created = metadata.user_created.unwrap_or(true);

        Ok(Activity {
            id,
            name,
            category,
            description,
            icon,
            color,
            kind,
            frequency,
            age_range: self.age_range.unwrap_or_default().normalize(),
            financial,
            is_active,
            user_created,
        })
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct FileMetadata {
    pub version: Option<String>,
    pub source: Option<String>,
    pub created_at: Option<String>,
    pub last_updated: Option<String>,
    pub total_activities: Option<usize>,
}

/// Contents of an activities data file: the converter's `{activities, metadata}`
/// wrapper or a bare list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ActivityFile {
    Wrapped {
        activities: Vec<Value>,
        #[serde(default)]
        metadata: Option<FileMetadata>,
    },
    Bare(Vec<Value>),
}

impl ActivityFile {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn metadata(&self) -> Option<&FileMetadata> {
        match self {
            ActivityFile::Wrapped { metadata, .. } => metadata.as_ref(),
            ActivityFile::Bare(_) => None,
        }
    }

    /// Normalizes every record, skipping the ones that can't be salvaged.
    pub fn into_activities(self) -> Vec<Activity> {
        let records = match self {
            ActivityFile::Wrapped { activities, .. } => activities,
            ActivityFile::Bare(activities) => activities,
        };

        let total = records.len();
        let activities: Vec<Activity> = records
            .into_iter()
            .enumerate()
            .filter_map(|(idx, record)| {
                let raw: RawActivity = match serde_json::from_value(record) {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!("skipping activity #{idx}: {e}");
                        return None;
                    }
                };

                match raw.normalize() {
                    Ok(activity) => Some(activity),
                    Err(e) => {
                        warn!("skipping activity #{idx}: {e}");
                        None
                    }
                }
            })
            .collect();

        debug!("normalized {}/{} activities", activities.len(), total);
        activities
    }
}
