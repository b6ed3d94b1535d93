// tests/http_endpoints.rs
//
// Real HTTP round-trips against in-process axum servers on 127.0.0.1:0.
//
// Covered:
// - StatsApiFeed schedule + live URLs and parsing
// - non-2xx live document -> FeedError::Status (scanner skips the game)
// - AdminPostNotifier JSON body keys; non-2xx is an error the dispatcher swallows

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde_json::Value;

use highlight_watcher::feed::statsapi::StatsApiFeed;
use highlight_watcher::feed::{FeedError, GameFeed, GameType};
use highlight_watcher::notify::{AdminPostNotifier, EventType, FINAL};
use highlight_watcher::{ContentPayload, Dispatcher, NotificationPayload, Notifier};

const SCHEDULE: &str = include_str!("fixtures/schedule_2025-11-01.json");
const WORLD_SERIES: &str = include_str!("fixtures/live_813024.json");

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

type Seen = Arc<Mutex<Vec<String>>>;

fn stats_router(seen: Seen) -> Router {
    Router::new()
        .route(
            "/api/v1/schedule",
            get(
                |State(seen): State<Seen>,
                 Query(q): Query<std::collections::HashMap<String, String>>| async move {
                    seen.lock().unwrap().push(format!(
                        "schedule sportId={} date={}",
                        q.get("sportId").cloned().unwrap_or_default(),
                        q.get("date").cloned().unwrap_or_default()
                    ));
                    SCHEDULE
                },
            ),
        )
        .route(
            "/api/v1.1/game/{pk}/feed/live",
            get(|Path(pk): Path<u64>| async move {
                if pk == 813024 {
                    (StatusCode::OK, WORLD_SERIES)
                } else {
                    (StatusCode::NOT_FOUND, "")
                }
            }),
        )
        .with_state(seen)
}

#[tokio::test]
async fn statsapi_feed_over_http() {
    let seen: Seen = Arc::default();
    let base = serve(stats_router(seen.clone())).await;
    let feed = StatsApiFeed::new(&base, 1, Duration::from_secs(5)).expect("client");

    let date = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
    let games = feed.list_games(date).await.expect("schedule");
    assert_eq!(games.len(), 3);
    assert_eq!(games[0].game_id, 813024);
    assert_eq!(games[0].game_type, GameType::Postseason);
    assert!(games[0].is_final);
    assert!(!games[1].is_final);
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        ["schedule sportId=1 date=2025-11-01".to_string()]
    );

    let doc = feed.live_game(813024).await.expect("live");
    assert_eq!(doc.context.score_diff, 1);
    assert_eq!(doc.plays.len(), 5);
    assert_eq!(doc.decisions.winner, Some(808967));
    assert_eq!(doc.decisions.save, Some(808963));

    match feed.live_game(1).await {
        Err(FeedError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_feed_is_an_http_error() {
    // port 9 (discard) on localhost is not listening in CI
    let feed = StatsApiFeed::new("http://127.0.0.1:9", 1, Duration::from_millis(500)).expect("client");
    let err = feed
        .list_games(NaiveDate::from_ymd_opt(2025, 11, 1).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, FeedError::Http { .. }), "{err}");
}

fn payload() -> NotificationPayload {
    let ctx = highlight_watcher::feed::GameContext {
        game_id: 813024,
        game_type: GameType::Postseason,
        game_type_code: "W".into(),
        away_team: "Los Angeles Dodgers".into(),
        home_team: "Toronto Blue Jays".into(),
        away_score: 5,
        home_score: 4,
        score_diff: 1,
        is_final: true,
    };
    NotificationPayload::build(
        "山本由伸",
        EventType::Victory,
        ContentPayload {
            title: "胴上げ投手".into(),
            desc: "山本由伸 earns the win!".into(),
            intensity: "5".into(),
        },
        &ctx,
        FINAL.to_string(),
    )
}

#[tokio::test]
async fn admin_post_sends_wire_keys() {
    let bodies: Arc<Mutex<Vec<Value>>> = Arc::default();
    let app = Router::new()
        .route(
            "/admin/moments",
            post(
                |State(b): State<Arc<Mutex<Vec<Value>>>>, Json(v): Json<Value>| async move {
                    b.lock().unwrap().push(v);
                    StatusCode::CREATED
                },
            ),
        )
        .with_state(bodies.clone());
    let base = serve(app).await;

    let notifier = AdminPostNotifier::new(format!("{base}/admin/moments")).with_timeout(5);
    notifier.send(&payload()).await.expect("post");

    let got = bodies.lock().unwrap().clone();
    assert_eq!(got.len(), 1);
    let v = &got[0];
    assert_eq!(v["player"], "山本由伸");
    assert_eq!(v["type"], "VICTORY");
    assert_eq!(v["visitor"], "LAD");
    assert_eq!(v["home"], "TOR");
    assert_eq!(v["visitorScore"], 5);
    assert_eq!(v["homeScore"], 4);
    assert_eq!(v["progress"], "Final");
    assert_eq!(v["intensity"], "5");
}

#[tokio::test]
async fn admin_rejection_is_logged_not_raised() {
    let app = Router::new().route(
        "/admin/moments",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "db down") }),
    );
    let base = serve(app).await;

    let notifier = AdminPostNotifier::new(format!("{base}/admin/moments"));
    assert!(notifier.send(&payload()).await.is_err());

    let dispatcher = Dispatcher::new(Arc::new(notifier), Duration::ZERO);
    assert!(!dispatcher.dispatch(&payload()).await);
}
