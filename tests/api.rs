//! HTTP API tests: sessions, predictions, locking, admin routes, leaderboard.

use actix_web::{cookie::Key, http::StatusCode, test, web::Data, App};
use march_mad_css::api::{self, AppState};
use march_mad_css::{pickable_players, Config, Predictions, Store, BRACKET};
use serde_json::{json, Value};

const OPEN_DEADLINE: &str = "2999-01-01T00:00:00Z";
const PAST_DEADLINE: &str = "2020-01-01T00:00:00Z";

fn state(deadline: &'static str) -> Data<AppState> {
    let config = Config::from_lookup(move |key| match key {
        "ADMIN_USERNAMES" => Some("boss".to_string()),
        "PREDICTION_DEADLINE" => Some(deadline.to_string()),
        _ => None,
    })
    .unwrap();
    Data::new(AppState::new(Store::open_in_memory().unwrap(), config))
}

fn chalk_bracket() -> Predictions {
    let mut p = Predictions::new();
    for game in &BRACKET {
        let winner = pickable_players(game.id, &p).0.unwrap().to_string();
        p.insert(game.id.to_string(), winner);
    }
    p
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .wrap(api::session_middleware(Key::from(&[7u8; 64][..]), false))
                .configure(api::configure),
        )
        .await
    };
}

/// Sign up `$username` and return their session cookie.
macro_rules! sign_up {
    ($app:expr, $username:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/sign-up")
            .set_json(json!({ "username": $username, "name": $username }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        resp.response()
            .cookies()
            .find(|c| c.name() == api::SESSION_COOKIE)
            .expect("session cookie")
            .into_owned()
    }};
}

#[actix_web::test]
async fn public_reads() {
    let state = state(OPEN_DEADLINE);
    let app = app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let players: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/players").to_request()).await;
    assert_eq!(players.as_array().unwrap().len(), 16);

    let games: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/bracket").to_request()).await;
    let games = games.as_array().unwrap();
    assert_eq!(games.len(), 15);
    assert_eq!(games[0]["id"], "r1-0");
    assert_eq!(games[0]["players"], json!(["maya-lindqvist", "theo-okafor"]));
    assert_eq!(games[8]["players"], json!([null, null]));
    assert_eq!(games[14]["points"], 80);

    let deadline: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/deadline").to_request()).await;
    assert_eq!(deadline["is_open"], true);
    assert!(deadline["seconds_remaining"].as_i64().unwrap() > 0);
}

#[actix_web::test]
async fn predictions_need_a_session() {
    let state = state(OPEN_DEADLINE);
    let app = app!(state);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/predictions").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Sign in required");
}

#[actix_web::test]
async fn sign_up_and_sign_in() {
    let state = state(OPEN_DEADLINE);
    let app = app!(state);
    let cookie = sign_up!(app, "alice");

    let me: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/auth/me").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(me["username"], "alice");
    assert_eq!(me["is_admin"], false);

    let dup = test::TestRequest::post()
        .uri("/api/auth/sign-up")
        .set_json(json!({ "username": "ALICE" }))
        .to_request();
    assert_eq!(test::call_service(&app, dup).await.status(), StatusCode::CONFLICT);

    let unknown = test::TestRequest::post()
        .uri("/api/auth/sign-in")
        .set_json(json!({ "username": "nobody", "secret": "whatever" }))
        .to_request();
    assert_eq!(test::call_service(&app, unknown).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn sign_in_needs_the_secret_from_sign_up() {
    let state = state(OPEN_DEADLINE);
    let app = app!(state);
    let req = test::TestRequest::post()
        .uri("/api/auth/sign-up")
        .set_json(json!({ "username": "boss" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created["is_admin"], true);
    let secret = created["secret"].as_str().unwrap().to_string();
    assert_eq!(secret.len(), 32);

    // A username alone, or a wrong secret, gets no session.
    for body in [
        json!({ "username": "boss" }),
        json!({ "username": "boss", "secret": "guess" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/auth/sign-in")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let cookie = resp.response().cookies().find(|c| c.name() == api::SESSION_COOKIE);
        if let Some(cookie) = cookie {
            let req = test::TestRequest::get()
                .uri("/api/admin/users")
                .cookie(cookie.into_owned())
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
        }
    }

    let req = test::TestRequest::post()
        .uri("/api/auth/sign-in")
        .set_json(json!({ "username": "BOSS", "secret": secret }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == api::SESSION_COOKIE)
        .expect("session cookie")
        .into_owned();
    let req = test::TestRequest::get()
        .uri("/api/admin/users")
        .cookie(cookie)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn save_then_lock_then_frozen() {
    let state = state(OPEN_DEADLINE);
    let app = app!(state);
    let cookie = sign_up!(app, "alice");
    let chalk = chalk_bracket();

    let mut partial = chalk.clone();
    partial.remove("final");
    let req = test::TestRequest::post()
        .uri("/api/predictions")
        .cookie(cookie.clone())
        .set_json(json!({ "predictions": partial }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["complete"], false);
    assert_eq!(body["is_locked"], false);

    let lock = || {
        test::TestRequest::post()
            .uri("/api/predictions/lock")
            .cookie(cookie.clone())
            .to_request()
    };
    assert_eq!(test::call_service(&app, lock()).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/predictions")
        .cookie(cookie.clone())
        .set_json(json!({ "predictions": chalk }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let resp = test::call_service(&app, lock()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["is_locked"], true);
    assert!(body["locked_at"].is_string());

    assert_eq!(test::call_service(&app, lock()).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/predictions")
        .cookie(cookie.clone())
        .set_json(json!({ "predictions": {} }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let stored: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/predictions").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(stored["predictions"], json!(chalk));

    let public: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/bracket/alice").to_request(),
    )
    .await;
    assert_eq!(public["predictions"], json!(chalk));
    assert_eq!(public["score"]["total"], 0);
}

#[actix_web::test]
async fn save_rejects_unknown_ids() {
    let state = state(OPEN_DEADLINE);
    let app = app!(state);
    let cookie = sign_up!(app, "alice");
    for predictions in [
        json!({ "r5-0": "maya-lindqvist" }),
        json!({ "r1-0": "someone-else" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/predictions")
            .cookie(cookie.clone())
            .set_json(json!({ "predictions": predictions }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}

#[actix_web::test]
async fn mutations_after_deadline_are_refused() {
    let state = state(PAST_DEADLINE);
    let app = app!(state);
    let cookie = sign_up!(app, "alice");
    let req = test::TestRequest::post()
        .uri("/api/predictions")
        .cookie(cookie.clone())
        .set_json(json!({ "predictions": { "r1-0": "maya-lindqvist" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "The prediction deadline has passed");

    let stored: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/predictions").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(stored["predictions"], json!({}));

    let deadline: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/deadline").to_request()).await;
    assert_eq!(deadline["is_open"], false);
    assert_eq!(deadline["seconds_remaining"], 0);
}

#[actix_web::test]
async fn admin_routes_are_gated() {
    let state = state(OPEN_DEADLINE);
    let app = app!(state);
    let anon = test::TestRequest::get().uri("/api/admin/users").to_request();
    assert_eq!(test::call_service(&app, anon).await.status(), StatusCode::UNAUTHORIZED);

    let alice = sign_up!(app, "alice");
    let req = test::TestRequest::get().uri("/api/admin/users").cookie(alice.clone()).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    let req = test::TestRequest::post()
        .uri("/api/leaderboard/calculate")
        .cookie(alice)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let boss = sign_up!(app, "boss");
    let users: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/admin/users").cookie(boss).to_request(),
    )
    .await;
    let names: Vec<&str> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["alice", "boss"]);
    assert_eq!(users[1]["is_admin"], true);
}

#[actix_web::test]
async fn results_drive_the_leaderboard() {
    let state = state(OPEN_DEADLINE);
    let app = app!(state);
    let alice = sign_up!(app, "alice");
    let boss = sign_up!(app, "boss");

    let req = test::TestRequest::post()
        .uri("/api/predictions")
        .cookie(alice.clone())
        .set_json(json!({ "predictions": chalk_bracket() }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let record = |game: &str, winner: &str| {
        test::TestRequest::put()
            .uri("/api/admin/results")
            .cookie(boss.clone())
            .set_json(json!({ "game_id": game, "winner_id": winner }))
            .to_request()
    };
    // qf-0 has no players until r1-0 and r1-1 have results.
    assert_eq!(
        test::call_service(&app, record("qf-0", "maya-lindqvist")).await.status(),
        StatusCode::BAD_REQUEST
    );
    for (game, winner) in [
        ("r1-0", "maya-lindqvist"),
        ("r1-1", "kenji-watanabe"),
        ("qf-0", "maya-lindqvist"),
    ] {
        assert_eq!(test::call_service(&app, record(game, winner)).await.status(), StatusCode::OK);
    }

    let calc: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/leaderboard/calculate")
            .cookie(boss.clone())
            .to_request(),
    )
    .await;
    assert_eq!(calc["users_scored"], 2);

    let board: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/leaderboard").to_request()).await;
    assert_eq!(board[0]["username"], "alice");
    assert_eq!(board[0]["rank"], 1);
    assert_eq!(board[0]["score"]["round1"], 10);
    assert_eq!(board[0]["score"]["quarterfinal"], 20);
    assert_eq!(board[0]["score"]["total"], 30);
    assert_eq!(board[1]["username"], "boss");
    assert_eq!(board[1]["rank"], 2);

    // Changing r1-0's winner drops the qf-0 result that advanced the old one.
    let changed: Value = test::call_and_read_body_json(&app, record("r1-0", "theo-okafor")).await;
    assert_eq!(changed["cleared"], json!(["qf-0"]));
    assert!(changed["results"].get("qf-0").is_none());

    let req = test::TestRequest::delete()
        .uri("/api/admin/results/r1-1")
        .cookie(boss.clone())
        .to_request();
    let cleared: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(cleared["results"], json!({ "r1-0": "theo-okafor" }));

    let csv = test::call_and_read_body(
        &app,
        test::TestRequest::get()
            .uri("/api/admin/leaderboard.csv")
            .cookie(boss)
            .to_request(),
    )
    .await;
    let csv = String::from_utf8(csv.to_vec()).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("rank,username,name,round1,quarterfinal,semifinal,final,total")
    );
    assert_eq!(lines.next(), Some("1,alice,alice,10,20,0,0,30"));
}

#[actix_web::test]
async fn admin_unlock_reopens_a_bracket() {
    let state = state(OPEN_DEADLINE);
    let app = app!(state);
    let alice = sign_up!(app, "alice");
    let boss = sign_up!(app, "boss");

    let save = |predictions: Predictions| {
        test::TestRequest::post()
            .uri("/api/predictions")
            .cookie(alice.clone())
            .set_json(json!({ "predictions": predictions }))
            .to_request()
    };
    assert_eq!(test::call_service(&app, save(chalk_bracket())).await.status(), StatusCode::OK);
    let lock = test::TestRequest::post()
        .uri("/api/predictions/lock")
        .cookie(alice.clone())
        .to_request();
    assert_eq!(test::call_service(&app, lock).await.status(), StatusCode::OK);

    let me: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/auth/me").cookie(alice.clone()).to_request(),
    )
    .await;
    let alice_id = me["id"].as_str().unwrap().to_string();

    let unlock = || {
        test::TestRequest::post()
            .uri(&format!("/api/admin/users/{}/unlock", alice_id))
            .cookie(boss.clone())
            .to_request()
    };
    assert_eq!(test::call_service(&app, unlock()).await.status(), StatusCode::OK);
    assert_eq!(test::call_service(&app, unlock()).await.status(), StatusCode::CONFLICT);

    assert_eq!(test::call_service(&app, save(Predictions::new())).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn unlocked_brackets_are_private() {
    let state = state(OPEN_DEADLINE);
    let app = app!(state);
    let _alice = sign_up!(app, "alice");
    for uri in ["/api/bracket/alice", "/api/bracket/nobody"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

#[actix_web::test]
async fn simulate_previews_without_storing() {
    let state = state(OPEN_DEADLINE);
    let app = app!(state);
    let boss = sign_up!(app, "boss");
    let preview: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/simulate")
            .cookie(boss.clone())
            .set_json(json!({ "through": "semifinal" }))
            .to_request(),
    )
    .await;
    assert_eq!(preview["results"].as_object().unwrap().len(), 14);
    assert_eq!(preview["leaderboard"].as_array().unwrap().len(), 1);

    let stored: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/admin/results").cookie(boss).to_request(),
    )
    .await;
    assert_eq!(stored, json!({}));
}
