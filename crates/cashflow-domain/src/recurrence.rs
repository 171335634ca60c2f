//! Recurrence cadences for repeating financial records.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::common::{TimeInterval, TimeUnit};

/// Average number of weeks in a month used to normalise weekly amounts.
pub const WEEKS_PER_MONTH: f64 = 4.33;
/// Months per quarter used to normalise quarterly amounts.
pub const MONTHS_PER_QUARTER: f64 = 3.0;
/// Months per year used to normalise yearly amounts.
pub const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Cadence of a recurring record.
///
/// `Unspecified` captures any pattern label the engine does not recognise. It advances and
/// normalises exactly like `Monthly`.
pub enum RecurrencePattern {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    Unspecified,
}

impl RecurrencePattern {
    /// Maps a stored label onto a pattern. Blank labels mean "no pattern".
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        let pattern = match normalized.as_str() {
            "" => return None,
            "weekly" => RecurrencePattern::Weekly,
            "monthly" => RecurrencePattern::Monthly,
            "quarterly" => RecurrencePattern::Quarterly,
            "yearly" | "annually" => RecurrencePattern::Yearly,
            _ => RecurrencePattern::Unspecified,
        };
        Some(pattern)
    }

    /// Interval between two consecutive occurrences.
    pub fn interval(self) -> TimeInterval {
        match self {
            RecurrencePattern::Weekly => TimeInterval::new(1, TimeUnit::Week),
            RecurrencePattern::Monthly | RecurrencePattern::Unspecified => {
                TimeInterval::new(1, TimeUnit::Month)
            }
            RecurrencePattern::Quarterly => TimeInterval::new(3, TimeUnit::Month),
            RecurrencePattern::Yearly => TimeInterval::new(1, TimeUnit::Year),
        }
    }

    /// Date of the `index`-th occurrence of a series seeded at `anchor` (index 0 is the seed).
    pub fn occurrence(self, anchor: NaiveDate, index: u32) -> Option<NaiveDate> {
        self.interval().nth_after(anchor, index)
    }

    /// Converts a per-occurrence amount into its monthly equivalent.
    pub fn monthly_equivalent(self, amount: f64) -> f64 {
        match self {
            RecurrencePattern::Weekly => amount * WEEKS_PER_MONTH,
            RecurrencePattern::Monthly | RecurrencePattern::Unspecified => amount,
            RecurrencePattern::Quarterly => amount / MONTHS_PER_QUARTER,
            RecurrencePattern::Yearly => amount / MONTHS_PER_YEAR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecurrencePattern::Weekly => "weekly",
            RecurrencePattern::Monthly => "monthly",
            RecurrencePattern::Quarterly => "quarterly",
            RecurrencePattern::Yearly => "yearly",
            RecurrencePattern::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecurrencePattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(RecurrencePattern::parse(&value).unwrap_or(RecurrencePattern::Unspecified))
    }
}

/// Field decoder for optional patterns: `null`, blank strings and non-string values decode to
/// `None`, unknown labels to `Unspecified`.
pub(crate) fn lenient_pattern<'de, D>(
    deserializer: D,
) -> Result<Option<RecurrencePattern>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPattern {
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Option::<RawPattern>::deserialize(deserializer)? {
        Some(RawPattern::Text(label)) => RecurrencePattern::parse(&label),
        Some(RawPattern::Other(_)) | None => None,
    })
}
