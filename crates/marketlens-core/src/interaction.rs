use tracing::debug;

use crate::selection::{order, DateSpan, Selection, SelectionMode};
use crate::DateKey;

/// Interaction phase while a selection is being built.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    /// First range endpoint chosen, awaiting the second click.
    RangeStart(DateKey),
}

/// Effect of a single interaction event.
///
/// Exactly one effect per event: a `Commit` must be pushed through the
/// broadcaster, a `Span` is rendered locally and never broadcast, keeping
/// the downstream re-query off the high-frequency hover path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Commit(Selection),
    Span(DateSpan),
    NoChange,
}

/// Owns the live [`Selection`] and [`SelectionMode`] and interprets raw
/// chart events into commits and transient spans.
///
/// Single writer: all other components read selection snapshots published
/// through the broadcaster.
#[derive(Debug)]
pub struct SelectionStateMachine {
    mode: SelectionMode,
    phase: Phase,
    selection: Selection,
}

impl Default for SelectionStateMachine {
    fn default() -> Self {
        Self::new(SelectionMode::default())
    }
}

impl SelectionStateMachine {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            phase: Phase::Idle,
            selection: Selection::None,
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// First endpoint of an in-progress range, if one is pending.
    ///
    /// Pointer-move tracking should be attached exactly while this is
    /// `Some` and detached on every path back to `None`.
    pub fn awaiting_second_endpoint(&self) -> Option<&DateKey> {
        match &self.phase {
            Phase::RangeStart(date) => Some(date),
            Phase::Idle => None,
        }
    }

    /// A click on the chart at the given x-axis date.
    pub fn click(&mut self, date: DateKey) -> Effect {
        match (self.mode, std::mem::replace(&mut self.phase, Phase::Idle)) {
            (SelectionMode::PointEntry, _) => {
                debug!(date = %date, "point selection committed");
                self.selection = Selection::point(date);
                Effect::Commit(self.selection.clone())
            }
            (SelectionMode::RangeEntry, Phase::Idle) => {
                // Clear the stale window downstream while the new one is
                // being built.
                debug!(start = %date, "range selection started");
                self.phase = Phase::RangeStart(date);
                self.selection = Selection::None;
                Effect::Commit(Selection::None)
            }
            (SelectionMode::RangeEntry, Phase::RangeStart(start)) => {
                debug!(start = %start, end = %date, "range selection completed");
                self.selection = Selection::range(start, date);
                Effect::Commit(self.selection.clone())
            }
        }
    }

    /// A pointer move over the chart at the given x-axis date.
    ///
    /// Only meaningful while a range is in progress; in `Idle` the event is
    /// consumed without producing a span or a broadcast.
    pub fn hover(&mut self, date: DateKey) -> Effect {
        match &self.phase {
            Phase::RangeStart(start) => Effect::Span(order(start.clone(), date)),
            Phase::Idle => Effect::NoChange,
        }
    }

    /// Switch between point and range entry; a real switch clears the
    /// current selection, including any in-progress range.
    pub fn set_mode(&mut self, mode: SelectionMode) -> Effect {
        if mode == self.mode {
            return Effect::NoChange;
        }

        debug!(mode = %mode, "selection mode changed");
        self.mode = mode;
        self.reset()
    }

    /// Explicit clear, also used when the chart window or symbol changes
    /// and a selected date may no longer be visible.
    pub fn clear(&mut self) -> Effect {
        self.reset()
    }

    fn reset(&mut self) -> Effect {
        self.phase = Phase::Idle;
        self.selection = Selection::None;
        Effect::Commit(Selection::None)
    }
}
