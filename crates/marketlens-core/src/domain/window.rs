use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Chart time windows selectable above the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "1y")]
    OneYear,
}

impl TimeWindow {
    pub const ALL: [Self; 4] = [
        Self::OneWeek,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::OneYear,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneWeek => "1w",
            Self::OneMonth => "1m",
            Self::ThreeMonths => "3m",
            Self::OneYear => "1y",
        }
    }

    /// Size of the default query window in days.
    pub const fn days(self) -> u32 {
        match self {
            Self::OneWeek => 7,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::OneYear => 365,
        }
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::OneMonth
    }
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1w" => Ok(Self::OneWeek),
            "1m" => Ok(Self::OneMonth),
            "3m" => Ok(Self::ThreeMonths),
            "1y" => Ok(Self::OneYear),
            other => Err(ValidationError::InvalidWindow {
                value: other.to_owned(),
            }),
        }
    }
}
