use std::fmt;

use serde::Serialize;

use crate::activity::{Activity, ActivityKind};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Money {
    pub amount: f64,
    pub currency: String,
}

impl Money {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    fn symbol(&self) -> Option<&'static str> {
        Some(match self.currency.as_str() {
            "USD" => "$",
            "EUR" => "€",
            "GBP" => "£",
            "JPY" => "¥",
            "INR" => "₹",
            _ => return None,
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount < 0. { "-" } else { "" };
        let amount = self.amount.abs();
        match self.symbol() {
            Some(symbol) => write!(f, "{sign}{symbol}{amount:.2}"),
            None => write!(f, "{sign}{} {amount:.2}", self.currency),
        }
    }
}

/// What a card shows, decided by the activity's kind.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum CardFace {
    Count {
        remaining: u64,
    },
    Money {
        /// Everything left to pay over the remaining occurrences.
        total: Money,
        per_unit: Money,
        unit: String,
    },
    Quote {
        text: String,
        author: String,
    },
}

impl CardFace {
    pub fn for_activity(activity: &Activity, remaining: u64) -> Self {
        match (activity.kind, &activity.financial) {
            (ActivityKind::Financial, Some(financial)) => CardFace::Money {
                total: Money::new(financial.amount * remaining as f64, &financial.currency),
                per_unit: Money::new(financial.amount, &financial.currency),
                unit: financial.unit.clone(),
            },
            (ActivityKind::Quote, _) => {
                let (text, author) = parse_quote(&activity.description);
                CardFace::Quote { text, author }
            }
            _ => CardFace::Count { remaining },
        }
    }

    /// The big text on the front of the card.
    pub fn headline(&self) -> String {
        match self {
            CardFace::Count { remaining } => remaining.to_string(),
            CardFace::Money { total, .. } => total.to_string(),
            CardFace::Quote { text, .. } => format!("“{text}”"),
        }
    }

    /// Secondary line, shown on the back of the card.
    pub fn detail(&self) -> Option<String> {
        match self {
            CardFace::Count { .. } => None,
            CardFace::Money { per_unit, unit, .. } => Some(format!("{per_unit} per {unit}")),
            CardFace::Quote { author, .. } if author.is_empty() => None,
            CardFace::Quote { author, .. } => Some(format!("— {author}")),
        }
    }
}

/// Splits `"<quote> - <author>"` on the last separator. Without one, the whole
/// description is the quote.
pub fn parse_quote(description: &str) -> (String, String) {
    match description.rsplit_once(" - ") {
        Some((text, author)) => (text.trim().to_string(), author.trim().to_string()),
        None => (description.trim().to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        activity::Financial,
        frequency::{Frequency, Period},
    };

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

    #[test]
    fn financial_total() {
        let face = CardFace::for_activity(&netflix(), 480);
        assert_eq!(face.headline(), "$7675.20");
        assert_eq!(face.detail().as_deref(), Some("$15.99 per month"));
    }

    #[test]
    fn money_display() {
        assert_eq!(Money::new(3.5, "EUR").to_string(), "€3.50");
        assert_eq!(Money::new(12., "SEK").to_string(), "SEK 12.00");
        assert_eq!(Money::new(-1.25, "GBP").to_string(), "-£1.25");
    }

    #[test]
    fn experiential_count() {
        let activity = Activity::experiential("Sunset", Frequency::new(1., Period::Week));
        let face = CardFace::for_activity(&activity, 1040);
        assert_eq!(face, CardFace::Count { remaining: 1040 });
        assert_eq!(face.headline(), "1040");
        assert_eq!(face.detail(), None);
    }

    #[test]
    fn financial_without_data_counts() {
        let mut activity = netflix();
        activity.financial = None;
        assert_eq!(
            CardFace::for_activity(&activity, 3),
            CardFace::Count { remaining: 3 }
        );
    }

    #[test]
    fn seneca() {
        let description =
            "It is not that we have a short time to live, but that we waste much of it. - Seneca";
        let (text, author) = parse_quote(description);
        assert_eq!(
            text,
            "It is not that we have a short time to live, but that we waste much of it."
        );
        assert_eq!(author, "Seneca");

        let face = CardFace::for_activity(&Activity::quote("Seneca", description), 0);
        assert_eq!(face.detail().as_deref(), Some("— Seneca"));
    }

    #[test]
    fn quote_splits_on_last_separator() {
        let (text, author) = parse_quote("Work - life - balance - Anonymous");
        assert_eq!(text, "Work - life - balance");
        assert_eq!(author, "Anonymous");
    }

    #[test]
    fn quote_without_author() {
        let (text, author) = parse_quote("Carpe diem");
        assert_eq!(text, "Carpe diem");
        assert_eq!(author, "");

        // a bare hyphen is not the separator
        let (text, author) = parse_quote("well-being");
        assert_eq!(text, "well-being");
        assert_eq!(author, "");

        let face = CardFace::for_activity(&Activity::quote("q", "Carpe diem"), 0);
        assert_eq!(face.detail(), None);
    }
}
