use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use foosball::AppState;

fn app() -> Router {
    foosball::app(AppState::in_memory())
}

async fn send(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn register(app: &Router, name: &str) -> String {
    let (status, body) = send(app, "POST", "/players", &format!(r#"{{"name": "{}"}}"#, name)).await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().unwrap().to_string()
}

async fn begin(app: &Router, a: &str, b: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/games",
        &format!(r#"{{"players": ["{}", "{}"]}}"#, a, b),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_player_roundtrip() {
    let app = app();

    let id = register(&app, "Alice").await;
    let (status, body) = send(&app, "GET", &format!("/players/{}", id), "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player"]["name"], "Alice");
    assert_eq!(body["player"]["games"], 0);
    assert!(body["player"]["last_played"].is_null());
    assert_eq!(body["recent_games"], serde_json::json!([]));
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let app = app();

    register(&app, "Bob").await;
    let (status, body) = send(&app, "POST", "/players", r#"{"name": "Bob"}"#).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "That name is already taken!");

    // No second record behind the error.
    let (_, body) = send(&app, "GET", "/", "").await;
    assert_eq!(body["players"], serde_json::json!(1));
}

#[tokio::test]
async fn a_full_match_shows_up_in_the_winners_profile() {
    let app = app();
    let alice = register(&app, "Alice").await;
    let bob = register(&app, "Bob").await;
    let game = begin(&app, &alice, &bob).await;

    let play_uri = format!("/games/{}/play", game);
    for _ in 0..5 {
        let (status, _) = send(
            &app,
            "POST",
            &play_uri,
            &format!(r#"{{"scorer": "{}"}}"#, alice),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, "GET", &format!("/players/{}", alice), "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player"]["games"], 1);
    assert_eq!(body["player"]["wins"], 1);
    assert_eq!(body["player"]["stats"], "(1-0-0)");
    assert_eq!(body["player"]["win_percent"], serde_json::json!(1.0));
    assert_eq!(body["recent_games"].as_array().unwrap().len(), 1);
    assert_eq!(body["recent_games"][0]["winner"], serde_json::json!(alice));

    // The loser's side of the same story.
    let (_, body) = send(&app, "GET", &format!("/players/{}", bob), "").await;
    assert_eq!(body["player"]["losses"], 1);
    assert_eq!(body["player"]["points_against"], 5);
}

#[tokio::test]
async fn game_view_puts_the_winner_in_the_first_seat() {
    let app = app();
    let alice = register(&app, "Alice").await;
    let bob = register(&app, "Bob").await;
    let game = begin(&app, &alice, &bob).await;

    let play_uri = format!("/games/{}/play", game);
    for _ in 0..5 {
        send(
            &app,
            "POST",
            &play_uri,
            &format!(r#"{{"scorer": "{}"}}"#, bob),
        )
        .await;
    }

    let (status, body) = send(&app, "GET", &format!("/games/{}", game), "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player1"]["player"]["name"], "Bob");
    assert_eq!(body["player1"]["score"], 5);
    assert_eq!(body["player2"]["player"]["name"], "Alice");
    assert_eq!(body["game"]["incomplete"], serde_json::json!(false));
}

#[tokio::test]
async fn ending_a_game_early_marks_it_incomplete() {
    let app = app();
    let alice = register(&app, "Alice").await;
    let bob = register(&app, "Bob").await;
    let game = begin(&app, &alice, &bob).await;

    let (status, body) = send(&app, "POST", &format!("/games/{}/end", game), "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["incomplete"], serde_json::json!(true));
    assert_eq!(body["winner"], serde_json::json!(alice));
    assert_eq!(body["loser"], serde_json::json!(bob));

    let (status, body) = send(&app, "POST", &format!("/games/{}/end", game), "").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Games can't end twice.");
}

#[tokio::test]
async fn recent_games_endpoint_lists_started_games() {
    let app = app();
    let alice = register(&app, "Alice").await;
    let bob = register(&app, "Bob").await;
    begin(&app, &alice, &bob).await;
    begin(&app, &alice, &bob).await;

    let (status, body) = send(&app, "GET", "/games/recent", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_ids_come_back_as_404_not_a_crash() {
    let app = app();

    let (status, _) = send(&app, "GET", "/players/definitely-not-a-uuid", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/games/definitely-not-a-uuid", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Which game are you looking for?");

    let (status, _) = send(
        &app,
        "POST",
        "/games/definitely-not-a-uuid/play",
        r#"{"scorer": "anyone"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn a_goal_without_a_scorer_is_rejected() {
    let app = app();
    let alice = register(&app, "Alice").await;
    let bob = register(&app, "Bob").await;
    let game = begin(&app, &alice, &bob).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/games/{}/play", game),
        r#"{"scorer": null}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Who scored?");
}
