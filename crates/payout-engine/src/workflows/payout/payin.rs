use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed pay-in ranges, inclusive at the upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayinCategory {
    #[serde(rename = "Below 20%")]
    BelowTwenty,
    #[serde(rename = "21% to 30%")]
    TwentyOneToThirty,
    #[serde(rename = "31% to 50%")]
    ThirtyOneToFifty,
    #[serde(rename = "Above 50%")]
    AboveFifty,
}

impl PayinCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::BelowTwenty => "Below 20%",
            Self::TwentyOneToThirty => "21% to 30%",
            Self::ThirtyOneToFifty => "31% to 50%",
            Self::AboveFifty => "Above 50%",
        }
    }

    pub fn for_value(value: f64) -> Self {
        if value <= 20.0 {
            Self::BelowTwenty
        } else if value <= 30.0 {
            Self::TwentyOneToThirty
        } else if value <= 50.0 {
            Self::ThirtyOneToFifty
        } else {
            Self::AboveFifty
        }
    }
}

/// Parsed pay-in value together with its bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifiedPayin {
    pub value: f64,
    pub category: PayinCategory,
}

impl ClassifiedPayin {
    const FALLBACK: Self = Self {
        value: 0.0,
        category: PayinCategory::BelowTwenty,
    };
}

/// Classifies whatever the extractor produced for `payin`. Never fails: anything
/// unparseable lands in the lowest bucket with a value of zero.
pub fn classify(raw: &Value) -> ClassifiedPayin {
    let parsed = match raw {
        Value::Number(number) => number.as_f64().map(f64::abs),
        Value::String(text) => parse_percent(text),
        _ => None,
    };

    match parsed {
        Some(value) if value.is_finite() => ClassifiedPayin {
            value,
            category: PayinCategory::for_value(value),
        },
        _ => ClassifiedPayin::FALLBACK,
    }
}

fn parse_percent(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|ch| !matches!(ch, '%' | ' ' | '-'))
        .collect();
    cleaned.trim().parse::<f64>().ok()
}
