//! Integration tests for the feed synchronizer against a mocked REST API
//!
//! The sportsbook API is stood up with wiremock so the real HTTP client,
//! response decoding and cache reconciliation run end to end.

mod common;

use pretty_assertions::assert_eq;
use sportsbook_client::common::types::{Bucket, GameEvent, GameStatus};
use sportsbook_client::config::FeedConfig;
use sportsbook_client::feed::{FeedSynchronizer, GameFeedCache, RefreshMode, SharedFeedCache};
use sportsbook_client::sportsbook::SportsbookRestClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::rest_bodies;

fn feed_config() -> FeedConfig {
    FeedConfig {
        page_size: 20,
        poll_interval_seconds: 0,
        keep_previous_data: true,
    }
}

fn new_cache() -> SharedFeedCache {
    Arc::new(RwLock::new(GameFeedCache::new()))
}

async fn mount_upcoming_and_live(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/games"))
        .and(query_param("status", "upcoming"))
        .and(query_param("sort", "matchDate"))
        .and(query_param("order", "asc"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rest_bodies::UPCOMING))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/games/live-feed"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rest_bodies::LIVE))
        .mount(server)
        .await;
}

async fn mount_failing_finished(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/games"))
        .and(query_param("status", "finished"))
        .and(query_param("order", "desc"))
        .respond_with(ResponseTemplate::new(500).set_body_string(rest_bodies::SERVER_ERROR))
        .mount(server)
        .await;
}

fn rest_client(server: &MockServer) -> Arc<SportsbookRestClient> {
    Arc::new(
        SportsbookRestClient::new(&format!("{}/api", server.uri()))
            .expect("Failed to create REST client"),
    )
}

// ============================================================================
// Refresh
// ============================================================================

#[test_log::test(tokio::test)]
async fn test_failed_bucket_leaves_others_intact() {
    let server = MockServer::start().await;
    mount_upcoming_and_live(&server).await;
    mount_failing_finished(&server).await;

    let cache = new_cache();
    let sync = FeedSynchronizer::new(cache.clone(), rest_client(&server), &feed_config());

    let report = sync.refresh(RefreshMode::KeepPrevious).await;
    assert_eq!(report.failed, vec![Bucket::Finished]);

    let cache = cache.read().await;
    // The cancelled fixture game is filtered out
    assert_eq!(cache.games(Bucket::Upcoming).len(), 1);
    assert_eq!(cache.games(Bucket::Upcoming)[0].id, common::ARSENAL_CHELSEA);
    assert_eq!(cache.games(Bucket::Live).len(), 1);
    assert_eq!(cache.games(Bucket::Live)[0].id, common::LAKERS_CELTICS);

    let finished = cache.bucket(Bucket::Finished);
    assert!(finished.games.is_empty());
    assert!(finished
        .error
        .as_deref()
        .unwrap_or_default()
        .contains("500"));
    assert!(!cache.is_loading());
}

#[tokio::test]
async fn test_keep_previous_survives_later_failure() {
    let server = MockServer::start().await;
    mount_upcoming_and_live(&server).await;

    let finished_body = r#"{"games": [{
        "_id": "65f1c0a2b3c4d5e6f7a8b9c2",
        "homeTeam": {"name": "Real Madrid"},
        "awayTeam": {"name": "Barcelona"},
        "status": "finished",
        "scores": {"home": 3, "away": 1}
    }]}"#;
    Mock::given(method("GET"))
        .and(path("/api/games"))
        .and(query_param("status", "finished"))
        .respond_with(ResponseTemplate::new(200).set_body_string(finished_body))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_failing_finished(&server).await;

    let cache = new_cache();
    let sync = FeedSynchronizer::new(cache.clone(), rest_client(&server), &feed_config());

    assert!(sync.refresh(RefreshMode::KeepPrevious).await.is_complete());
    let report = sync.refresh(RefreshMode::KeepPrevious).await;
    assert_eq!(report.failed, vec![Bucket::Finished]);

    let cache = cache.read().await;
    let finished = cache.bucket(Bucket::Finished);
    assert_eq!(finished.games.len(), 1);
    assert_eq!(finished.games[0].id, common::MADRID_BARCA);
    assert!(finished.has_error());
}

#[tokio::test]
async fn test_replace_mode_blanks_failed_bucket() {
    let server = MockServer::start().await;
    mount_upcoming_and_live(&server).await;
    mount_failing_finished(&server).await;

    let cache = new_cache();
    let stale = common::sample_game(
        common::MADRID_BARCA,
        "Real Madrid",
        "Barcelona",
        GameStatus::Finished,
    );
    cache
        .write()
        .await
        .apply_fetch(Bucket::Finished, Ok(vec![stale]), RefreshMode::Replace);

    let sync = FeedSynchronizer::new(cache.clone(), rest_client(&server), &feed_config());
    sync.refresh(RefreshMode::Replace).await;

    let cache = cache.read().await;
    assert!(cache.games(Bucket::Finished).is_empty());
    assert_eq!(cache.games(Bucket::Live).len(), 1);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/games/live-feed"))
        .and(header("authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rest_bodies::LIVE))
        .expect(1)
        .mount(&server)
        .await;

    let client = SportsbookRestClient::new(&format!("{}/api", server.uri()))
        .unwrap()
        .with_auth_token("session-token");
    let games = client.get_live_feed().await.unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].status, GameStatus::Live);
}

// ============================================================================
// Push updates on top of a refresh
// ============================================================================

#[tokio::test]
async fn test_push_update_moves_game_between_buckets() {
    let server = MockServer::start().await;
    mount_upcoming_and_live(&server).await;
    mount_failing_finished(&server).await;

    let cache = new_cache();
    let sync = FeedSynchronizer::new(cache.clone(), rest_client(&server), &feed_config());
    sync.refresh_default().await;

    let (tx, rx) = mpsc::channel(16);
    let handle = sync.spawn(rx);

    let mut kicked_off = common::upcoming_game();
    kicked_off.status = GameStatus::Live;
    tx.send(GameEvent::GameUpdate(kicked_off)).await.unwrap();
    tx.send(GameEvent::Heartbeat).await.unwrap();

    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if cache.read().await.locate(common::ARSENAL_CHELSEA) == Some(Bucket::Live) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("push update was not applied");

    handle.shutdown().await.unwrap();

    let cache = cache.read().await;
    assert!(cache.games(Bucket::Upcoming).is_empty());
    let live: Vec<_> = cache.games(Bucket::Live).iter().map(|g| g.id.as_str()).collect();
    assert_eq!(live, vec![common::ARSENAL_CHELSEA, common::LAKERS_CELTICS]);
}
