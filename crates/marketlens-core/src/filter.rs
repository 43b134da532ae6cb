use crate::selection::Selection;
use crate::NewsArticle;

/// Client-side fallback filter over an already-fetched record set.
///
/// Used when the consumer already holds an unfiltered window and must
/// narrow it locally, either because the feed does not support the date
/// shape or as a cross-check against server-side filtering.
pub struct NewsFilterEngine;

impl NewsFilterEngine {
    /// Narrow `records` to the selection.
    ///
    /// Inclusive on both ends, string-ordered on the canonical date key.
    /// Never mutates its input, preserves relative order, and is
    /// idempotent. An empty result is a valid outcome, not an error.
    pub fn filter(records: &[NewsArticle], selection: &Selection) -> Vec<NewsArticle> {
        match selection {
            Selection::None => records.to_vec(),
            Selection::Point { date } => records
                .iter()
                .filter(|record| record.date == *date)
                .cloned()
                .collect(),
            Selection::Range { start, end, .. } => records
                .iter()
                .filter(|record| *start <= record.date && record.date <= *end)
                .cloned()
                .collect(),
        }
    }
}
