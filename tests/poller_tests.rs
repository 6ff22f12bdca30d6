#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Integration tests for the background refresh loop.
//!
//! All tests run on a paused clock, so interval ticks and scripted delays
//! advance deterministically whenever the runtime is idle.

mod common;

use std::time::Duration;

use sequence_client::protocol::GameStatus;
use sequence_client::{CacheKey, FetchState, GameClient, Operation, PollEvent};
use tokio::time::Instant;

use common::{
    client, five_of_hearts, lobby_game, running_game, server_error, test_config, Call, MockApi,
    GAME, HOST_PRIVATE,
};

/// Yield until `cond` holds. Never advances the paused clock.
async fn until(cond: impl Fn() -> bool) {
    while !cond() {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn polls_immediately_then_every_interval() {
    let api = MockApi::new()
        .on_fetch(Ok(Some(lobby_game())))
        .on_fetch(Ok(Some(running_game())));
    let client = client(api);
    let key = CacheKey::player(GAME, HOST_PRIVATE);
    let start = Instant::now();

    let (mut poller, mut events) = client.watch(key.clone());
    assert_eq!(poller.key(), &key);
    assert!(poller.is_running());

    let first = events.recv().await.unwrap();
    assert!(matches!(first, PollEvent::Updated { .. }));
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(
        client.cache().snapshot(&key).unwrap().status,
        Some(GameStatus::NotStarted)
    );

    let second = events.recv().await.unwrap();
    assert!(matches!(second, PollEvent::Updated { .. }));
    assert_eq!(start.elapsed(), Duration::from_secs(1));
    assert_eq!(
        client.cache().snapshot(&key).unwrap().status,
        Some(GameStatus::InProgress)
    );

    poller.shutdown().await;
    assert_eq!(client.api().fetch_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn viewer_key_polls_viewer_endpoint() {
    let api = MockApi::new().on_fetch(Ok(Some(lobby_game())));
    let client = client(api);

    let (mut poller, mut events) = client.watch(CacheKey::viewer(GAME));
    events.recv().await.unwrap();
    poller.shutdown().await;

    assert_eq!(
        client.api().calls(),
        vec![Call::FetchAsViewer { game: GAME.into() }]
    );
}

#[tokio::test(start_paused = true)]
async fn failed_tick_does_not_stop_polling() {
    let api = MockApi::new()
        .on_fetch(Err(server_error(Operation::FetchGame)))
        .on_fetch(Ok(Some(lobby_game())));
    let client = client(api);
    let key = CacheKey::player(GAME, HOST_PRIVATE);

    let (mut poller, mut events) = client.watch(key.clone());

    assert_eq!(
        events.recv().await.unwrap(),
        PollEvent::Failed {
            message: "Unable to load game details.".into()
        }
    );
    let entry = client.cache().entry(&key).unwrap();
    assert_eq!(entry.state, FetchState::Error);
    assert!(entry.snapshot.is_none());

    assert!(matches!(
        events.recv().await.unwrap(),
        PollEvent::Updated { .. }
    ));
    let entry = client.cache().entry(&key).unwrap();
    assert_eq!(entry.state, FetchState::Ready);
    assert!(entry.last_error.is_none());

    poller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn in_flight_poll_loses_to_concurrent_move() {
    let mut after_move = running_game();
    after_move.current_player_turn = None;
    let api = MockApi::new()
        .on_fetch_after(Duration::from_millis(500), Ok(Some(running_game())))
        .on_move(Ok(Some(after_move.clone())));
    let client = client(api);
    let key = CacheKey::player(GAME, HOST_PRIVATE);

    let (mut poller, mut events) = client.watch(key.clone());
    let api = std::sync::Arc::clone(client.api());
    until(move || api.fetch_count() == 1).await;

    let action = sequence_client::MoveAction {
        row: 0,
        column: 1,
        card: Some(five_of_hearts()),
    };
    client
        .submit_move(GAME, HOST_PRIVATE, &action)
        .await
        .unwrap();
    let written = client.cache().entry(&key).unwrap().version;

    let event = events.recv().await.unwrap();
    assert!(matches!(event, PollEvent::Stale { stamp } if stamp < written));

    let entry = client.cache().entry(&key).unwrap();
    assert_eq!(entry.version, written);
    assert_eq!(entry.state, FetchState::Ready);
    assert_eq!(*entry.snapshot.unwrap(), after_move);

    poller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_closes_event_channel() {
    let api = MockApi::new().on_fetch(Ok(Some(lobby_game())));
    let client = client(api);

    let (mut poller, mut events) = client.watch(CacheKey::player(GAME, HOST_PRIVATE));
    events.recv().await.unwrap();

    poller.shutdown().await;
    assert!(!poller.is_running());
    assert!(events.recv().await.is_none());

    // A second shutdown is a no-op.
    poller.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_in_flight_fetch() {
    let api = MockApi::new().on_fetch_after(Duration::from_secs(30), Ok(Some(lobby_game())));
    let client = client(api);
    let key = CacheKey::viewer(GAME);
    let start = Instant::now();

    let (mut poller, mut events) = client.watch(key.clone());
    let api = std::sync::Arc::clone(client.api());
    until(move || api.fetch_count() == 1).await;

    poller.shutdown().await;
    assert!(start.elapsed() < Duration::from_secs(1));
    assert!(events.recv().await.is_none());

    let entry = client.cache().entry(&key).unwrap();
    assert_eq!(entry.state, FetchState::Idle);
    assert!(entry.snapshot.is_none());
}

#[tokio::test(start_paused = true)]
async fn cancelled_fetch_leaves_previous_snapshot_ready() {
    let api = MockApi::new()
        .on_fetch(Ok(Some(lobby_game())))
        .on_fetch_after(Duration::from_secs(30), Ok(Some(running_game())));
    let client = client(api);
    let key = CacheKey::viewer(GAME);

    let (poller, mut events) = client.watch(key.clone());
    events.recv().await.unwrap();
    // The second tick's fetch is still waiting on the server.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(client.api().fetch_count(), 2);
    assert_eq!(client.cache().entry(&key).unwrap().state, FetchState::Fetching);

    drop(poller);
    assert!(events.recv().await.is_none());

    let entry = client.cache().entry(&key).unwrap();
    assert_eq!(entry.state, FetchState::Ready);
    assert_eq!(entry.snapshot.unwrap().status, Some(GameStatus::NotStarted));
}

#[tokio::test(start_paused = true)]
async fn dropping_the_poller_stops_polling() {
    let api = MockApi::new()
        .on_fetch(Ok(Some(lobby_game())))
        .on_fetch(Ok(Some(lobby_game())));
    let client = client(api);

    let (poller, mut events) = client.watch(CacheKey::viewer(GAME));
    events.recv().await.unwrap();
    drop(poller);

    assert!(events.recv().await.is_none());
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(client.api().fetch_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn full_event_channel_drops_events_without_stalling() {
    let api = MockApi::new()
        .on_fetch(Ok(Some(lobby_game())))
        .on_fetch(Ok(Some(lobby_game())))
        .on_fetch(Ok(Some(running_game())));
    let client = GameClient::new(api, test_config().with_event_channel_capacity(1));
    let key = CacheKey::viewer(GAME);

    let (mut poller, mut events) = client.watch(key.clone());
    tokio::time::sleep(Duration::from_millis(2500)).await;

    assert_eq!(client.api().fetch_count(), 3);
    assert!(matches!(
        events.recv().await.unwrap(),
        PollEvent::Updated { .. }
    ));
    assert!(events.try_recv().is_err());
    assert_eq!(
        client.cache().snapshot(&key).unwrap().status,
        Some(GameStatus::InProgress)
    );

    poller.shutdown().await;
}
