//! Behavior-driven tests for stale-response suppression and panel states.
//!
//! Queries complete out of order in the real world; only the most recently
//! issued one may touch the view, and failures must keep the committed
//! selection so the user can retry.

use std::sync::Arc;

use marketlens_core::{
    DataFeed, ExplorerSession, NewsPanelState, Selection, SelectionMode, Symbol, TimeWindow,
};
use marketlens_tests::{article, date, FailingFeed, ScriptedFeed};

fn ten_days() -> Vec<marketlens_core::NewsArticle> {
    (1..=10)
        .map(|day| article(day, &format!("2025-04-{day:02}")))
        .collect()
}

#[tokio::test]
async fn when_b_resolves_before_a_the_view_reflects_b() {
    // Given: A session whose feed serves the full ten-day window
    let feed = Arc::new(ScriptedFeed::window_only(ten_days()));
    let mut session = ExplorerSession::new(
        Arc::clone(&feed) as Arc<dyn DataFeed>,
        Symbol::general(),
        TimeWindow::OneMonth,
        SelectionMode::PointEntry,
    );

    // When: Query A is issued for 04-02, then the selection changes and
    // query B is issued for 04-07
    session.click(date("2025-04-02"));
    let prepared_a = session.prepare_news_query().expect("must route");

    session.click(date("2025-04-07"));
    let prepared_b = session.prepare_news_query().expect("must route");

    // And: B completes first, A completes second
    let response_b = feed.news(prepared_b.routed.query.clone()).await;
    assert!(session.apply_news_response(&prepared_b, response_b));

    let response_a = feed.news(prepared_a.routed.query.clone()).await;
    assert!(
        !session.apply_news_response(&prepared_a, response_a),
        "the slow early response must be discarded"
    );

    // Then: The panel shows B's single day, not A's
    match session.news() {
        NewsPanelState::Ready(articles) => {
            assert_eq!(articles.len(), 1);
            assert_eq!(articles[0].date, date("2025-04-07"));
        }
        other => panic!("expected ready panel, got {other:?}"),
    }
}

#[tokio::test]
async fn when_the_fetch_fails_the_selection_survives_for_retry() {
    // Given: A feed that is down
    let mut session = ExplorerSession::new(
        Arc::new(FailingFeed),
        Symbol::general(),
        TimeWindow::OneMonth,
        SelectionMode::PointEntry,
    );
    session.click(date("2025-04-06"));

    // When: The refresh fails at transport level
    let state = session.refresh_news().await.expect("routing still works");

    // Then: The panel shows an explicit failure, distinct from empty
    assert!(matches!(state, NewsPanelState::Failed { .. }));

    // And: The committed selection is retained so the same query can be
    // retried
    assert_eq!(
        session.selection(),
        &Selection::point(date("2025-04-06"))
    );
}

#[tokio::test]
async fn a_selection_matching_nothing_is_empty_not_an_error() {
    // Given: Ten days of records and a selection outside them
    let feed = Arc::new(ScriptedFeed::window_only(ten_days()));
    let mut session = ExplorerSession::new(
        feed,
        Symbol::general(),
        TimeWindow::OneMonth,
        SelectionMode::PointEntry,
    );
    session.click(date("2025-05-20"));

    // When: The refresh completes
    let state = session.refresh_news().await.expect("must route");

    // Then: The panel lands on the explicit no-records state
    assert_eq!(state, &NewsPanelState::Empty);
}

#[tokio::test]
async fn preparing_a_query_flips_the_panel_to_loading() {
    // Given: A session that already rendered a result
    let feed = Arc::new(ScriptedFeed::window_only(ten_days()));
    let mut session = ExplorerSession::new(
        feed,
        Symbol::general(),
        TimeWindow::OneMonth,
        SelectionMode::PointEntry,
    );
    session.refresh_news().await.expect("must route");
    assert!(matches!(session.news(), NewsPanelState::Ready(_)));

    // When: A new query is prepared but not yet applied
    let _prepared = session.prepare_news_query().expect("must route");

    // Then: The panel is loading until the matching response arrives
    assert_eq!(session.news(), &NewsPanelState::Loading);
}
