use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DateKey, ValidationError};

/// Ordered date span, `start <= end`, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: DateKey,
    pub end: DateKey,
}

impl DateSpan {
    pub fn contains(&self, date: &DateKey) -> bool {
        self.start <= *date && *date <= self.end
    }

    /// A span whose endpoints coincide encodes a single-date selection.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

/// Order two endpoints chronologically, regardless of click order.
///
/// Pure and total: any two date keys are comparable, and the result is the
/// same whichever argument came first.
pub fn order(a: DateKey, b: DateKey) -> DateSpan {
    if b < a {
        DateSpan { start: b, end: a }
    } else {
        DateSpan { start: a, end: b }
    }
}

/// The user's current temporal focus on the timeline.
///
/// `Range` is the canonical wire shape; `Point` is a construction
/// convenience that collapses to the degenerate span `[d, d]` at the query
/// boundary via [`Selection::canonical_range`]. Consumers should go through
/// that accessor instead of branching on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    None,
    Point {
        date: DateKey,
    },
    Range {
        start: DateKey,
        end: DateKey,
        in_progress: bool,
    },
}

impl Selection {
    pub fn point(date: DateKey) -> Self {
        Self::Point { date }
    }

    /// Completed range from two endpoints given in either order.
    pub fn range(a: DateKey, b: DateKey) -> Self {
        let span = order(a, b);
        Self::Range {
            start: span.start,
            end: span.end,
            in_progress: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Canonical range-shaped view consumed by downstream collaborators.
    ///
    /// A point collapses to `[d, d]`; an in-progress range has no canonical
    /// shape yet and yields `None`, as does the empty selection.
    pub fn canonical_range(&self) -> Option<DateSpan> {
        match self {
            Self::None => None,
            Self::Point { date } => Some(DateSpan {
                start: date.clone(),
                end: date.clone(),
            }),
            Self::Range {
                in_progress: true, ..
            } => None,
            Self::Range { start, end, .. } => Some(DateSpan {
                start: start.clone(),
                end: end.clone(),
            }),
        }
    }
}

/// Governs how raw clicks on the chart are interpreted.
///
/// Independent of the current [`Selection`] value; switching modes clears
/// the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    PointEntry,
    RangeEntry,
}

impl SelectionMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PointEntry => "point",
            Self::RangeEntry => "range",
        }
    }
}

impl Default for SelectionMode {
    fn default() -> Self {
        Self::PointEntry
    }
}

impl Display for SelectionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionMode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "point" => Ok(Self::PointEntry),
            "range" => Ok(Self::RangeEntry),
            other => Err(ValidationError::InvalidSelectionMode {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(key: &str) -> DateKey {
        DateKey::normalize(key).expect("valid date")
    }

    #[test]
    fn order_is_commutative_on_the_pair() {
        let a = date("2025-04-09");
        let b = date("2025-04-03");

        let forward = order(a.clone(), b.clone());
        let backward = order(b, a);

        assert_eq!(forward, backward);
        assert_eq!(forward.start.as_str(), "2025-04-03");
        assert_eq!(forward.end.as_str(), "2025-04-09");
    }

    #[test]
    fn point_collapses_to_degenerate_range() {
        let selection = Selection::point(date("2025-04-06"));
        let span = selection.canonical_range().expect("point has a span");

        assert!(span.is_degenerate());
        assert_eq!(span, order(date("2025-04-06"), date("2025-04-06")));
    }

    #[test]
    fn in_progress_range_has_no_canonical_shape() {
        let selection = Selection::Range {
            start: date("2025-04-06"),
            end: date("2025-04-02"),
            in_progress: true,
        };
        assert!(selection.canonical_range().is_none());
    }

    #[test]
    fn span_bounds_are_inclusive() {
        let span = order(date("2025-04-02"), date("2025-04-06"));

        assert!(span.contains(&date("2025-04-02")));
        assert!(span.contains(&date("2025-04-06")));
        assert!(span.contains(&date("2025-04-04")));
        assert!(!span.contains(&date("2025-04-07")));
    }
}
