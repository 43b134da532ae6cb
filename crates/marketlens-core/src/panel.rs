use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::data_source::FeedError;
use crate::selection::{DateSpan, Selection};
use crate::{DateKey, NewsArticle};

/// Dependent news list view state.
///
/// `Empty` is a normal filtered-to-nothing outcome and must render
/// distinctly from both `Loading` and `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum NewsPanelState {
    /// A query is in flight and nothing has been applied yet.
    Loading,
    Ready(Vec<NewsArticle>),
    Empty,
    Failed { message: String },
}

impl NewsPanelState {
    pub fn from_result(result: Result<Vec<NewsArticle>, FeedError>) -> Self {
        match result {
            Ok(articles) if articles.is_empty() => Self::Empty,
            Ok(articles) => Self::Ready(articles),
            Err(error) => Self::Failed {
                message: error.to_string(),
            },
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Empty => "empty",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Overlay descriptors handed to the render collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "overlay", rename_all = "snake_case")]
pub enum SelectionOverlay {
    /// Vertical reference line at a single selected date.
    ReferenceLine { date: DateKey },
    /// Shaded reference area over a date span.
    ReferenceArea {
        start: DateKey,
        end: DateKey,
        in_progress: bool,
    },
}

impl SelectionOverlay {
    /// Overlay for a committed selection, if it is visible at all.
    pub fn for_selection(selection: &Selection) -> Option<Self> {
        match selection {
            Selection::None => None,
            Selection::Point { date } => Some(Self::ReferenceLine { date: date.clone() }),
            Selection::Range {
                start,
                end,
                in_progress,
            } => Some(Self::ReferenceArea {
                start: start.clone(),
                end: end.clone(),
                in_progress: *in_progress,
            }),
        }
    }

    /// Overlay for the transient hover span of an in-progress range.
    pub fn for_span(span: &DateSpan) -> Self {
        Self::ReferenceArea {
            start: span.start.clone(),
            end: span.end.clone(),
            in_progress: true,
        }
    }
}

/// Render collaborator contract for the chart surface.
///
/// The surface can translate a pixel x-coordinate to the x-axis category
/// under it and toggle pointer-move tracking.
pub trait ChartSurface: Send + Sync {
    /// Date of the x-axis category at pixel `x`, if inside the plot area.
    fn date_at(&self, x: f64) -> Option<DateKey>;

    fn set_pointer_tracking(&self, enabled: bool);
}

/// Pixel-to-category mapping over a loaded, date-ordered series.
#[derive(Debug)]
pub struct CategoryAxis {
    dates: Vec<DateKey>,
    width_px: f64,
    tracking: AtomicBool,
}

impl CategoryAxis {
    pub fn new(dates: Vec<DateKey>, width_px: f64) -> Self {
        Self {
            dates,
            width_px,
            tracking: AtomicBool::new(false),
        }
    }

    pub fn pointer_tracking(&self) -> bool {
        self.tracking.load(Ordering::SeqCst)
    }
}

impl ChartSurface for CategoryAxis {
    fn date_at(&self, x: f64) -> Option<DateKey> {
        if self.dates.is_empty() || self.width_px <= 0.0 || x < 0.0 || x > self.width_px {
            return None;
        }

        let slot = (x / self.width_px * self.dates.len() as f64) as usize;
        let index = slot.min(self.dates.len() - 1);
        Some(self.dates[index].clone())
    }

    fn set_pointer_tracking(&self, enabled: bool) {
        self.tracking.store(enabled, Ordering::SeqCst);
    }
}

/// Scoped pointer-move acquisition for the in-progress range window.
///
/// Tracking is enabled on construction and guaranteed off on every exit
/// path, since dropping the guard is the only way out.
pub struct PointerCapture {
    surface: Arc<dyn ChartSurface>,
}

impl PointerCapture {
    pub fn acquire(surface: Arc<dyn ChartSurface>) -> Self {
        surface.set_pointer_tracking(true);
        Self { surface }
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.surface.set_pointer_tracking(false);
    }
}
